// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use fieldlog::Level;

// The only test in this binary, so no other thread reads the environment concurrently.
#[test]
fn init_from_env_reads_level() {
    // SAFETY: single-threaded at this point; see above.
    unsafe {
        std::env::set_var("FIELDLOG_LEVEL", "warn");
        std::env::set_var("FIELDLOG_STDERR", "true");
    }

    fieldlog::init_from_env();
    assert_eq!(fieldlog::default_logger().level(), Level::Warn);
    assert!(!fieldlog::default_logger().enabled(Level::Info));

    let err = fieldlog::try_init_from_env().unwrap_err();
    assert_eq!(err.message(), "the default logger has already been initialized");
}
