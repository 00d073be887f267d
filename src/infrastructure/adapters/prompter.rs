//! 운영자 입력 포트 구현 어댑터.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::{Result, bail};

use crate::application::ports::{Choice, Prompter};

/// stdin으로 선택/입력을 받는 어댑터.
pub struct StdinPrompter;

impl StdinPrompter {
    fn read_line(&self) -> Result<String> {
        io::stderr().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

impl Prompter for StdinPrompter {
    fn select(&self, message: &str, choices: &[Choice], default: Option<&str>) -> Result<String> {
        loop {
            eprintln!("{message}");
            for (idx, choice) in choices.iter().enumerate() {
                eprintln!("  {}) {}", idx + 1, choice.label);
            }
            match default.and_then(|d| choices.iter().find(|c| c.value == d)) {
                Some(choice) => eprint!("select [default: {}]: ", choice.label),
                None => eprint!("select: "),
            }

            let answer = self.read_line()?;
            if answer.is_empty()
                && let Some(default) = default
            {
                return Ok(default.to_string());
            }
            if let Ok(idx) = answer.parse::<usize>()
                && idx >= 1
                && idx <= choices.len()
            {
                return Ok(choices[idx - 1].value.clone());
            }
            if let Some(choice) = choices
                .iter()
                .find(|c| c.value == answer || c.label.eq_ignore_ascii_case(&answer))
            {
                return Ok(choice.value.clone());
            }
            eprintln!("unrecognized choice: {answer}");
        }
    }

    fn input(&self, message: &str) -> Result<String> {
        eprint!("{message}: ");
        self.read_line()
    }

    fn secret(&self, message: &str) -> Result<String> {
        // raw 모드 없이 stdin으로 받는다. 값은 화면에 남을 수 있다.
        eprint!("{message}: ");
        self.read_line()
    }
}

/// 준비된 답을 순서대로 돌려주는 어댑터(라이브러리 직접 호출/테스트용).
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    fn next(&self, message: &str) -> Result<String> {
        let mut answers = self
            .answers
            .lock()
            .map_err(|_| anyhow::anyhow!("scripted prompter poisoned"))?;
        match answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no scripted answer left for prompt: {message}"),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, message: &str, choices: &[Choice], _default: Option<&str>) -> Result<String> {
        let answer = self.next(message)?;
        if !choices.iter().any(|c| c.value == answer) {
            bail!("scripted answer '{answer}' is not a valid choice for: {message}");
        }
        Ok(answer)
    }

    fn input(&self, message: &str) -> Result<String> {
        self.next(message)
    }

    fn secret(&self, message: &str) -> Result<String> {
        self.next(message)
    }
}
