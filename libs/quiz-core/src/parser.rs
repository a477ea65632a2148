//! Markdown parser for question bank files.
//!
//! # Format
//! ```markdown
//! ## 第 1 題【單選題】
//! **English:** What is 2+2?
//! **中文：** 2+2是多少？
//! **選項：**
//! - A. 3
//! - B. 4
//! **正確答案：B**
//!
//! ---
//!
//! ## *第 2 題【簡答題】
//! **English:** Explain borrowing.
//! **中文：** 解釋借用。
//! ![圖片](images/borrow.png)
//! **參考答案**
//! References without ownership.
//! **題目解析**
//! Optional markdown explanation.
//! ```
//!
//! Blocks are separated by `---` lines. A `*` (or `★`) before `第` marks the
//! question as important. Blocks without a recognizable header are skipped.

use crate::types::{Question, QuestionKind, QuestionOption};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

const ENGLISH_LABEL: &str = "**English:**";
const CHINESE_LABEL: &str = "**中文：**";
const IMAGE_MARKER: &str = "![圖片]";
const OPTIONS_LABEL: &str = "**選項：**";
const REFERENCE_MARKER: &str = "**參考答案";
const CORRECT_MARKER: &str = "**正確答案";
const EXPLANATION_MARKER: &str = "**題目解析";

/// Delimiter inserted between merged documents.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"##\s*([*★⭐])?\s*第\s*(\d+)\s*題\s*【(單選題|多選題|簡答題)】")
        .expect("header pattern")
});

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[圖片\]\((.*?)\)").expect("image pattern"));

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-F])\.\s*(.*)$").expect("option pattern"));

static CORRECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*正確答案[ \t]*[：:][ \t]*(?:\*\*)?[ \t]*([A-F](?:[ \t,，、]*[A-F])*)")
        .expect("correct answer pattern")
});

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*參考答案\s*[：:]?\s*\*\*").expect("reference answer pattern")
});

static EXPLANATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*題目解析\s*[：:]?\s*\*\*").expect("explanation pattern")
});

/// Parse markdown content into questions sorted by number.
///
/// Malformed blocks are dropped; an empty result is the caller's load failure.
/// Duplicate numbers are kept in document order.
pub fn parse(markdown: &str) -> Vec<Question> {
    let mut questions = Vec::new();
    let mut skipped = 0usize;

    for block in split_blocks(markdown) {
        match parse_block(&block) {
            Some(question) => questions.push(question),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, parsed = questions.len(), "skipped unrecognized blocks");
    }

    questions.sort_by_key(|q| q.number);
    questions
}

/// Join several documents into one parseable string, preserving their order.
pub fn merge_documents<S: AsRef<str>>(documents: &[S]) -> String {
    documents
        .iter()
        .map(|d| d.as_ref())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

fn is_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

fn split_blocks(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        if is_rule(line) {
            blocks.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    blocks.push(current.join("\n"));

    blocks.retain(|b| !b.trim().is_empty());
    blocks
}

fn parse_block(block: &str) -> Option<Question> {
    let header = HEADER_RE.captures(block)?;
    let number = header[2].parse::<u32>().ok()?;
    let kind = QuestionKind::from_label(&header[3])?;
    let is_important = header.get(1).is_some();

    let prompt_english = english_prompt(block);
    let prompt_chinese = chinese_prompt(block);

    let images = IMAGE_RE
        .captures_iter(block)
        .map(|c| c[1].trim().to_string())
        .collect();

    let (options, correct_answer, reference_answer) = match kind {
        QuestionKind::ShortAnswer => (Vec::new(), BTreeSet::new(), reference_answer(block)),
        QuestionKind::SingleChoice | QuestionKind::MultipleChoice => {
            (options(block), correct_answer(block), None)
        }
    };

    let has_prompt = !prompt_english.is_empty() || !prompt_chinese.is_empty();
    let has_body = !options.is_empty() || reference_answer.is_some();
    if !has_prompt && !has_body {
        return None;
    }

    Some(Question {
        number,
        kind,
        is_important,
        prompt_english,
        prompt_chinese,
        images,
        options,
        correct_answer,
        reference_answer,
        explanation: explanation(block),
    })
}

/// Text following `label`, if the label occurs.
fn after<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.find(label).map(|pos| &text[pos + label.len()..])
}

/// Earliest position of any marker in `text`.
fn first_of(text: &str, markers: &[&str]) -> Option<usize> {
    markers.iter().filter_map(|m| text.find(m)).min()
}

fn english_prompt(block: &str) -> String {
    let Some(rest) = after(block, ENGLISH_LABEL) else {
        return String::new();
    };
    // English-only questions have no Chinese label to stop at.
    let end = first_of(rest, &[CHINESE_LABEL])
        .or_else(|| {
            first_of(
                rest,
                &[IMAGE_MARKER, OPTIONS_LABEL, REFERENCE_MARKER, CORRECT_MARKER, EXPLANATION_MARKER],
            )
        })
        .unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

fn chinese_prompt(block: &str) -> String {
    let Some(rest) = after(block, CHINESE_LABEL) else {
        return String::new();
    };
    let end = first_of(rest, &[IMAGE_MARKER, OPTIONS_LABEL, REFERENCE_MARKER])
        .or_else(|| first_of(rest, &[CORRECT_MARKER, EXPLANATION_MARKER]))
        .unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

fn options(block: &str) -> Vec<QuestionOption> {
    let Some(rest) = after(block, OPTIONS_LABEL) else {
        return Vec::new();
    };
    let end = first_of(rest, &[CORRECT_MARKER, EXPLANATION_MARKER]).unwrap_or(rest.len());

    rest[..end]
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('-'))
        .filter_map(|line| {
            let caps = OPTION_RE.captures(line.trim())?;
            let letter = caps[1].chars().next()?;
            Some(QuestionOption::new(letter, caps[2].trim()))
        })
        .collect()
}

fn correct_answer(block: &str) -> BTreeSet<char> {
    CORRECT_RE
        .captures(block)
        .map(|caps| {
            caps[1]
                .chars()
                .filter(|c| ('A'..='F').contains(c))
                .collect()
        })
        .unwrap_or_default()
}

fn reference_answer(block: &str) -> Option<String> {
    let label = REFERENCE_RE.find(block)?;
    let rest = &block[label.end()..];
    let end = EXPLANATION_RE.find(rest).map_or(rest.len(), |m| m.start());
    non_empty(&rest[..end])
}

fn explanation(block: &str) -> Option<String> {
    let label = EXPLANATION_RE.find(block)?;
    non_empty(&block[label.end()..])
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
