#![allow(dead_code, unused_imports)]

use std::error::Error;

pub use pugwatch_test_utils::builders::{DispatcherBuilder, TemplateTree, MOCK_OUT, MOCK_ROOT};
pub use pugwatch_test_utils::clock::ManualClock;
pub use pugwatch_test_utils::fake_compiler::FakeCompiler;
pub use pugwatch_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn Error>>;
