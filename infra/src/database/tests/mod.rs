//! Database tests. Anything touching MySQL is `#[ignore]`d and reads
//! `DATABASE_URL`.

mod connection_tests;
mod repository_tests;
