include!("stage.rs");
include!("exec.rs");
include!("step.rs");
include!("mutate.rs");
include!("tests.rs");
