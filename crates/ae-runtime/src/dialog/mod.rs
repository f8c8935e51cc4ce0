include!("session.rs");
include!("selection.rs");
include!("transition.rs");
include!("snapshot.rs");
include!("tests.rs");
