//! 콘솔 리포터 포트 구현 어댑터.

use std::io::{self, IsTerminal};

use crate::application::ports::Reporter;

/// 콘솔 전용 리포터 어댑터. TTY일 때만 색을 입힌다.
pub struct ConsoleReporter {
    colored: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            colored: io::stdout().is_terminal(),
        }
    }

    fn paint(&self, code: &str, message: &str) -> String {
        if self.colored {
            format!("\x1b[{code}m{message}\x1b[0m")
        } else {
            message.to_string()
        }
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, name: &str) {
        println!();
        println!("==================== {} ====================", name);
    }

    fn kv(&self, key: &str, value: &str) {
        println!("{:<16}: {}", key, value);
    }

    fn status(&self, scope: &str, message: &str) {
        println!("[{:<8}] {}", scope, message);
    }

    fn success(&self, scope: &str, message: &str) {
        println!("[{:<8}] {}", scope, self.paint("32", message));
    }

    fn warn(&self, scope: &str, message: &str) {
        println!("[{:<8}] {}", scope, self.paint("33", message));
    }
}

/// 출력을 전부 삼키는 리포터(라이브러리 직접 호출/테스트용).
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn section(&self, _name: &str) {}
    fn kv(&self, _key: &str, _value: &str) {}
    fn status(&self, _scope: &str, _message: &str) {}
    fn success(&self, _scope: &str, _message: &str) {}
    fn warn(&self, _scope: &str, _message: &str) {}
}
