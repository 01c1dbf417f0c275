use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON envelope written for every command.
#[derive(Debug, Serialize)]
pub struct Report<'a, T> {
    pub generated_at: DateTime<Utc>,
    pub train: &'a Path,
    pub test: &'a Path,
    pub result: &'a T,
}

impl<'a, T> Report<'a, T>
where
    T: Serialize,
{
    pub fn new(train: &'a Path, test: &'a Path, result: &'a T) -> Self {
        Self {
            generated_at: Utc::now(),
            train,
            test,
            result,
        }
    }
}
