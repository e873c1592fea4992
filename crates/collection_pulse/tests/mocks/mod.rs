#![allow(dead_code)]

pub mod datastore;
pub mod generator;
pub mod speech;
