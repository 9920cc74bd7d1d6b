// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskbindError {
    #[error("Only one of SecurityGroup or SecurityGroups can be populated")]
    ConflictingSecurityGroups,

    #[error("No subnets in VPC {vpc_id} match selection {selection}")]
    NoMatchingSubnets { vpc_id: String, selection: String },

    #[error("Invalid ARN: {0}")]
    InvalidArn(String),
}

pub type Result<T> = std::result::Result<T, TaskbindError>;
