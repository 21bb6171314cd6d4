//! Database integration tests.

use super::*;
use crate::error::AppError;
use crate::models::paste::*;
use crate::test_support::{request, request_expiring, setup_temp_db, T0};

const MINUTE: i64 = 60_000;
const HOUR: i64 = 60 * MINUTE;

mod basic_ops;
