pub const INSERT_MANY: usize = 100_000;
pub const GET_MANY: usize = 100_000;
pub const THREADS: usize = 8;
