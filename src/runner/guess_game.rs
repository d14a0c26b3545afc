//! Scripted "guess the number" fallback
//!
//! A guessing game needs a live conversation with the player, which a
//! one-shot run with pre-supplied input cannot have. Programs that use
//! `srand`, `rand` and `scanf` together are therefore not executed; instead
//! one round of the game is acted out from the program's own prompts.
//!
//! The round is reproducible: the secret is derived from a hash of the
//! source, and the guess is the first input token (or, without input, a
//! second value derived from the same hash).

use crate::io::unescape;
use crate::parser::lexer::{Lexer, Token};
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

const DEFAULT_INTRO: &str = "猜数字游戏开始！";
const DEFAULT_PROMPT: &str = "请输入一个数字：";
const DEFAULT_RANGE: i64 = 100;

/// Whether `source` should get the scripted round instead of a real run
pub fn applies(source: &str) -> bool {
    let lower = source.to_lowercase();
    lower.contains("srand") && lower.contains("rand") && lower.contains("scanf")
}

/// The facts of one scripted round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRound {
    pub intro: String,
    pub prompt: String,
    /// Secrets are drawn from `1..=range`
    pub range: i64,
    pub secret: i64,
    pub guess: i64,
    /// No usable input was given, so the guess was made up
    pub simulated: bool,
}

impl GuessRound {
    pub fn new(source: &str, stdin: &str) -> Self {
        let tokens = Lexer::new(source).tokenize().unwrap_or_default();
        let literals = printf_literals(&tokens);

        let intro = literals
            .iter()
            .find(|s| s.contains("猜数字"))
            .cloned()
            .unwrap_or_else(|| DEFAULT_INTRO.to_string());
        let prompt = literals
            .iter()
            .find(|s| s.contains("输入") && **s != intro)
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

        let range = rand_modulus(&tokens).unwrap_or(DEFAULT_RANGE);

        let mut hasher = FxHasher::default();
        source.hash(&mut hasher);
        let hash = hasher.finish();
        let secret = draw(hash, range);

        let typed = stdin
            .split(|c: char| c == ',' || c.is_whitespace())
            .find(|t| !t.is_empty())
            .and_then(|t| t.parse::<i64>().ok());
        let (guess, simulated) = match typed {
            Some(guess) => (guess, false),
            None => (draw(hash >> 32, range), true),
        };

        GuessRound {
            intro,
            prompt,
            range,
            secret,
            guess,
            simulated,
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self.guess.cmp(&self.secret) {
            std::cmp::Ordering::Equal => "恭喜你，猜对了！",
            std::cmp::Ordering::Greater => "太大了，请再试一次。",
            std::cmp::Ordering::Less => "太小了，请再试一次。",
        }
    }

    /// The transcript printed in place of real output
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, &self.intro);
        push_line(&mut out, &self.prompt);
        let label = if self.simulated { "模拟输入" } else { "输入" };
        out.push_str(&format!("[{}]: {}\n", label, self.guess));
        out.push_str(self.verdict());
        out.push('\n');
        out.push_str("\n[模拟环境说明]: 在真实编译环境中，你可以通过标准输入进行交互式输入。\n");
        out.push_str(&format!("[本次游戏的秘密数字是]: {}\n", self.secret));
        out
    }
}

/// Play one scripted round and return its transcript.
pub fn play(source: &str, stdin: &str) -> String {
    GuessRound::new(source, stdin).transcript()
}

fn draw(hash: u64, range: i64) -> i64 {
    let range = range.max(1);
    (hash % range as u64) as i64 + 1
}

fn push_line(out: &mut String, text: &str) {
    out.push_str(text.trim_end_matches('\n'));
    out.push('\n');
}

/// Decoded text of every `printf("...")` format, in source order
fn printf_literals(tokens: &[Token]) -> Vec<String> {
    tokens
        .windows(3)
        .filter_map(|w| match w {
            [Token::Ident(name, _), Token::LParen(_), Token::StringLiteral(raw, _)]
                if name == "printf" =>
            {
                Some(unescape(raw))
            }
            _ => None,
        })
        .collect()
}

/// `N` from the first `rand() % N`
fn rand_modulus(tokens: &[Token]) -> Option<i64> {
    tokens.windows(5).find_map(|w| match w {
        [Token::Ident(name, _), Token::LParen(_), Token::RParen(_), Token::Percent(_), Token::IntLiteral(n, _)]
            if name == "rand" && *n > 0 =>
        {
            Some(*n)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = r#"#include <stdio.h>
#include <stdlib.h>
#include <time.h>

int main() {
    int secret, guess;
    srand(time(NULL));
    secret = rand() % 50 + 1;
    printf("欢迎来到猜数字游戏！\n");
    printf("请输入你的猜测: ");
    scanf("%d", &guess);
    return 0;
}
"#;

    #[test]
    fn test_detection() {
        assert!(applies(GAME));
        assert!(!applies("int main() { int x; scanf(\"%d\", &x); return 0; }"));
    }

    #[test]
    fn test_round_uses_program_text() {
        let round = GuessRound::new(GAME, "");
        assert_eq!(round.intro, "欢迎来到猜数字游戏！\n");
        assert_eq!(round.prompt, "请输入你的猜测: ");
        assert_eq!(round.range, 50);
        assert!((1..=50).contains(&round.secret));
        assert!(round.simulated);
    }

    #[test]
    fn test_round_is_reproducible() {
        assert_eq!(play(GAME, "17"), play(GAME, "17"));
    }

    #[test]
    fn test_verdicts() {
        let secret = GuessRound::new(GAME, "").secret;

        let hit = play(GAME, &secret.to_string());
        assert!(hit.contains("[输入]: "));
        assert!(hit.contains("恭喜你，猜对了！"));

        let high = play(GAME, &(secret + 1).to_string());
        assert!(high.contains("太大了"));

        let low = play(GAME, &(secret - 1).to_string());
        assert!(low.contains("太小了"));
        assert!(low.ends_with(&format!("[本次游戏的秘密数字是]: {}\n", secret)));
    }

    #[test]
    fn test_defaults_without_prompts() {
        let round = GuessRound::new("int main() { srand(1); int n = rand(); scanf(\"%d\", &n); return 0; }", "");
        assert_eq!(round.intro, DEFAULT_INTRO);
        assert_eq!(round.prompt, DEFAULT_PROMPT);
        assert_eq!(round.range, DEFAULT_RANGE);
    }
}
