include!("state.rs");
include!("dispatch.rs");
include!("commands.rs");
include!("replay.rs");
include!("tests.rs");
