//! Exit codes of the `tally` binary. Part of the public contract.

pub const SUCCESS: i32 = 0;
pub const RUN_FAILED: i32 = 1; // Backend, cache or output failure during a run
pub const CONFIG_ERROR: i32 = 2; // Invalid config, items or provider setup
