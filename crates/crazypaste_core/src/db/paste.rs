//! Paste storage operations backed by redb.
//!
//! Every paste lives in one JSON array stored under [`PASTES_KEY`]. Mutating
//! operations read, modify, and write that whole document inside a single
//! redb write transaction, so concurrent callers in one process are
//! serialized rather than overwriting each other.

use crate::clock::Clock;
use crate::db::tables::{DOCUMENTS, PASTES_KEY};
use crate::error::AppError;
use crate::models::expiration::expiration_timestamp_at;
use crate::models::paste::{
    generate_id, CreatePasteRequest, ForkDraft, ImportSummary, Paste, RecentFilter,
};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// In-transaction view of the paste collection.
///
/// Tracks whether anything changed so read-only passes skip the write.
pub struct PasteCollection {
    pastes: Vec<Paste>,
    dirty: bool,
}

impl PasteCollection {
    fn new(pastes: Vec<Paste>) -> Self {
        Self {
            pastes,
            dirty: false,
        }
    }

    /// Stored pastes in storage order.
    pub fn as_slice(&self) -> &[Paste] {
        &self.pastes
    }

    /// Find a paste by exact id.
    pub fn find(&self, id: &str) -> Option<&Paste> {
        self.pastes.iter().find(|paste| paste.id == id)
    }

    /// Whether a paste with `id` is stored.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Mutable access to a paste; marks the collection as changed.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Paste> {
        let paste = self.pastes.iter_mut().find(|paste| paste.id == id)?;
        self.dirty = true;
        Some(paste)
    }

    /// Insert at the front (newest first).
    pub fn prepend(&mut self, paste: Paste) {
        self.pastes.insert(0, paste);
        self.dirty = true;
    }

    /// Insert at the back.
    pub fn append(&mut self, paste: Paste) {
        self.pastes.push(paste);
        self.dirty = true;
    }

    /// Remove a paste by id.
    pub fn remove(&mut self, id: &str) -> Option<Paste> {
        let index = self.pastes.iter().position(|paste| paste.id == id)?;
        self.dirty = true;
        Some(self.pastes.remove(index))
    }

    /// Keep only pastes matching `keep`; returns how many were removed.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Paste) -> bool,
    {
        let before = self.pastes.len();
        self.pastes.retain(keep);
        let removed = before - self.pastes.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }
}

fn load_document<T>(table: &T) -> Result<Vec<Paste>, AppError>
where
    T: ReadableTable<&'static str, &'static str>,
{
    match table.get(PASTES_KEY)? {
        Some(value) => Ok(serde_json::from_str(value.value())?),
        None => Ok(Vec::new()),
    }
}

fn validate_record(paste: &Paste) -> Result<(), String> {
    if paste.id.trim().is_empty() {
        return Err("Paste id cannot be empty".to_string());
    }
    if paste.content.trim().is_empty() {
        return Err(format!("Paste '{}' has empty content", paste.id));
    }
    if let Some(expires) = paste.expires {
        if expires <= paste.created {
            return Err(format!(
                "Paste '{}' expires ({}) at or before its creation ({})",
                paste.id, expires, paste.created
            ));
        }
    }
    Ok(())
}

/// Accessor for the paste document.
pub struct PasteDb {
    db: Arc<redb::Database>,
    clock: Arc<dyn Clock>,
}

impl PasteDb {
    /// Initialize the document table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(DOCUMENTS)?;
        write_txn.commit()?;
        Ok(Self { db, clock })
    }

    /// Time source used for expiry checks.
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// Run `op` against the collection inside one write transaction.
    ///
    /// The document is written back and committed only when `op` changed it
    /// and returned `Ok`. An `Err` from `op` leaves storage untouched.
    ///
    /// # Errors
    /// Propagates errors from `op`, storage, and (de)serialization.
    pub fn transact<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut PasteCollection) -> Result<T, AppError>,
    {
        let write_txn = self.db.begin_write()?;
        let (value, dirty) = {
            let mut table = write_txn.open_table(DOCUMENTS)?;
            let mut collection = PasteCollection::new(load_document(&table)?);
            let value = op(&mut collection)?;
            if collection.dirty {
                let encoded = serde_json::to_string(&collection.pastes)?;
                table.insert(PASTES_KEY, encoded.as_str())?;
            }
            (value, collection.dirty)
        };

        if dirty {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(value)
    }

    fn read_all(&self) -> Result<Vec<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DOCUMENTS)?;
        load_document(&table)
    }

    /// Create and persist a new paste.
    ///
    /// # Returns
    /// The stored paste including its generated id.
    ///
    /// # Errors
    /// [`AppError::BadRequest`] for blank content; storage errors otherwise.
    pub fn create(&self, req: CreatePasteRequest) -> Result<Paste, AppError> {
        let now = self.clock.now();
        let expires = req
            .expiration
            .as_deref()
            .and_then(|selector| expiration_timestamp_at(selector, now));
        let Some(mut paste) = Paste::from_request(req, now.timestamp_millis(), expires) else {
            return Err(AppError::BadRequest(
                "Paste content cannot be empty".to_string(),
            ));
        };

        let paste = self.transact(|pastes| {
            let mut id = generate_id();
            while pastes.contains(&id) {
                id = generate_id();
            }
            paste.id = id;
            pastes.prepend(paste.clone());
            Ok(paste)
        })?;
        tracing::debug!(
            "Created paste {} (expires: {:?}, burn: {})",
            paste.id,
            paste.expires,
            paste.burn_after_reading
        );
        Ok(paste)
    }

    /// Insert a fully formed paste, rejecting duplicate ids.
    ///
    /// # Errors
    /// [`AppError::BadRequest`] for invalid records, [`AppError::StorageMessage`]
    /// when the id already exists.
    pub fn insert(&self, paste: &Paste) -> Result<(), AppError> {
        validate_record(paste).map_err(AppError::BadRequest)?;
        self.transact(|pastes| {
            if pastes.contains(&paste.id) {
                return Err(AppError::StorageMessage(format!(
                    "Paste id '{}' already exists",
                    paste.id
                )));
            }
            pastes.prepend(paste.clone());
            Ok(())
        })
    }

    /// Side-effect free lookup.
    ///
    /// Expired pastes read as absent but are left in place.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn peek(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let now = self.clock.now_millis();
        Ok(self
            .read_all()?
            .into_iter()
            .find(|paste| paste.id == id)
            .filter(|paste| !paste.is_expired_at(now)))
    }

    /// Retrieve a paste, applying expiration and burn-after-reading.
    ///
    /// Expired pastes are deleted and reported absent. Burn pastes have their
    /// view count incremented; the first read returns the paste with
    /// `views == 1`, any later read deletes it and returns `None`.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Paste>, AppError> {
        self.consume(id, |_| Ok(()))
    }

    /// Retrieve a paste on behalf of a reader holding an optional password.
    ///
    /// The password is checked before any view is counted, so a missing or
    /// wrong password never consumes a burn paste.
    ///
    /// # Errors
    /// [`AppError::PasswordRequired`] or [`AppError::InvalidPassword`] for
    /// protected pastes; storage errors otherwise.
    pub fn open(&self, id: &str, password: Option<&str>) -> Result<Option<Paste>, AppError> {
        self.consume(id, |paste| {
            if !paste.is_protected() {
                return Ok(());
            }
            match password {
                None => Err(AppError::PasswordRequired),
                Some(candidate) if paste.password_matches(candidate) => Ok(()),
                Some(_) => Err(AppError::InvalidPassword),
            }
        })
    }

    fn consume<G>(&self, id: &str, gate: G) -> Result<Option<Paste>, AppError>
    where
        G: FnOnce(&Paste) -> Result<(), AppError>,
    {
        self.transact(|pastes| {
            let now = self.clock.now_millis();
            let Some(current) = pastes.find(id) else {
                return Ok(None);
            };

            if current.is_expired_at(now) {
                pastes.remove(id);
                tracing::debug!("Deleted expired paste {} on read", id);
                return Ok(None);
            }

            gate(current)?;

            if !current.burn_after_reading {
                return Ok(Some(current.clone()));
            }

            let Some(paste) = pastes.find_mut(id) else {
                return Ok(None);
            };
            paste.views += 1;
            if paste.views > 1 {
                pastes.remove(id);
                tracing::debug!("Burned paste {} after read", id);
                return Ok(None);
            }
            Ok(Some(paste.clone()))
        })
    }

    /// All live pastes in storage order.
    ///
    /// Expired pastes are removed from storage as part of the call.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn get_all(&self) -> Result<Vec<Paste>, AppError> {
        self.transact(|pastes| {
            let now = self.clock.now_millis();
            let removed = pastes.retain(|paste| !paste.is_expired_at(now));
            if removed > 0 {
                tracing::debug!("Swept {} expired pastes while listing", removed);
            }
            Ok(pastes.as_slice().to_vec())
        })
    }

    /// Most recently created pastes, newest first, after applying `filter`.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn get_recent(&self, limit: usize, filter: RecentFilter) -> Result<Vec<Paste>, AppError> {
        let mut pastes: Vec<Paste> = self
            .get_all()?
            .into_iter()
            .filter(|paste| !(filter.exclude_protected && paste.is_protected()))
            .filter(|paste| !(filter.exclude_burn && paste.burn_after_reading))
            .collect();
        pastes.sort_by(|a, b| b.created.cmp(&a.created));
        pastes.truncate(limit);
        Ok(pastes)
    }

    /// Delete a paste by id.
    ///
    /// # Returns
    /// `true` when a row was removed, `false` when nothing matched.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        self.transact(|pastes| Ok(pastes.remove(id).is_some()))
    }

    /// Replace the stored paste with the same id.
    ///
    /// The stored `created` timestamp is kept, and the replacement must pass
    /// the same checks as [`PasteDb::insert`].
    ///
    /// # Returns
    /// `false` when no paste has that id.
    ///
    /// # Errors
    /// [`AppError::BadRequest`] for an invalid replacement; storage errors
    /// otherwise.
    pub fn update(&self, paste: &Paste) -> Result<bool, AppError> {
        self.transact(|pastes| {
            let Some(created) = pastes.find(&paste.id).map(|stored| stored.created) else {
                return Ok(false);
            };
            let mut replacement = paste.clone();
            replacement.created = created;
            validate_record(&replacement).map_err(AppError::BadRequest)?;
            if let Some(stored) = pastes.find_mut(&paste.id) {
                *stored = replacement;
            }
            Ok(true)
        })
    }

    /// Compare `candidate` with the stored password.
    ///
    /// Uses [`PasteDb::peek`], so checking a burn paste does not consume its
    /// read.
    ///
    /// # Returns
    /// `false` when the paste is missing, expired, or unprotected.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn verify_password(&self, id: &str, candidate: &str) -> Result<bool, AppError> {
        Ok(self
            .peek(id)?
            .is_some_and(|paste| paste.password_matches(candidate)))
    }

    /// Resolve a fork source into a pre-populated creation draft.
    ///
    /// Goes through [`PasteDb::open`], so forking counts as a read.
    ///
    /// # Errors
    /// Same as [`PasteDb::open`].
    pub fn fork(&self, id: &str, password: Option<&str>) -> Result<Option<ForkDraft>, AppError> {
        Ok(self.open(id, password)?.map(|paste| paste.fork_draft()))
    }

    /// Remove every expired paste.
    ///
    /// # Returns
    /// Number of pastes removed.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn sweep_expired(&self) -> Result<usize, AppError> {
        self.transact(|pastes| {
            let now = self.clock.now_millis();
            Ok(pastes.retain(|paste| !paste.is_expired_at(now)))
        })
    }

    /// Serialize the stored document as pretty JSON.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn export_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.read_all()?)?)
    }

    /// Merge an exported JSON array into the store.
    ///
    /// Records with an existing id or failing validation are skipped.
    ///
    /// # Errors
    /// [`AppError::Serialization`] when `raw` is not a paste array; storage
    /// errors otherwise.
    pub fn import_json(&self, raw: &str) -> Result<ImportSummary, AppError> {
        let incoming: Vec<Paste> = serde_json::from_str(raw)?;
        self.transact(|pastes| {
            let mut summary = ImportSummary::default();
            for paste in incoming {
                if let Err(reason) = validate_record(&paste) {
                    tracing::warn!("Skipping imported paste: {}", reason);
                    summary.skipped += 1;
                    continue;
                }
                if pastes.contains(&paste.id) {
                    tracing::warn!("Skipping imported paste '{}': id already exists", paste.id);
                    summary.skipped += 1;
                    continue;
                }
                pastes.append(paste);
                summary.imported += 1;
            }
            Ok(summary)
        })
    }
}
