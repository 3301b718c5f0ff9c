//! Single-line inline tokenizer.
//!
//! One left-to-right scan over a fixed alternation of span patterns. The
//! first alternative that matches at a position wins; anything between
//! matches becomes an unmarked text run. Malformed markup is never an error.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::block::{Inline, Mark};
use crate::config::Config;

const STRONG: &str = r"\*\*(?P<strong>[^*]+)\*\*";
const STRIKE: &str = r"~~(?P<strike>[^~]+)~~";
const EMPHASIS: &str = r"\*(?P<em>[^*]+)\*";
const LINK: &str = r"\[(?P<link_text>[^\]|]+)\]\((?P<link_href>[^)]+)\)";
const PIPE_LINK: &str = r"\[(?P<pipe_text>[^\]|]+)\|(?P<pipe_href>[^\]]+)\]";
const CODE: &str = r"`(?P<code>[^`]+)`";

static SPANS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&[STRONG, STRIKE, EMPHASIS, LINK, PIPE_LINK, CODE].join("|")).unwrap()
});

static SPANS_NO_PIPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&[STRONG, STRIKE, EMPHASIS, LINK, CODE].join("|")).unwrap());

/// Tokenize one line into inline nodes, covering every character of the input.
pub fn tokenize(line: &str, config: &Config) -> Vec<Inline> {
    let spans: &Regex = if config.links.pipe_syntax {
        &*SPANS
    } else {
        &*SPANS_NO_PIPE
    };

    let mut out = Vec::new();
    scan(line, spans, &[], &mut out);
    out
}

fn scan(text: &str, spans: &Regex, outer: &[Mark], out: &mut Vec<Inline>) {
    let mut last = 0;

    for caps in spans.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            push_run(&text[last..whole.start()], outer.to_vec(), out);
        }
        emit_span(&caps, spans, outer, out);
        last = whole.end();
    }

    if last < text.len() {
        push_run(&text[last..], outer.to_vec(), out);
    }
}

fn emit_span(caps: &Captures, spans: &Regex, outer: &[Mark], out: &mut Vec<Inline>) {
    if let Some(body) = caps.name("strong") {
        scan(body.as_str(), spans, &with_mark(outer, Mark::Strong), out);
    } else if let Some(body) = caps.name("strike") {
        scan(body.as_str(), spans, &with_mark(outer, Mark::Strike), out);
    } else if let Some(body) = caps.name("em") {
        scan(body.as_str(), spans, &with_mark(outer, Mark::Emphasis), out);
    } else if let (Some(body), Some(href)) = (caps.name("link_text"), caps.name("link_href")) {
        let link = Mark::Link {
            href: href.as_str().trim().to_string(),
        };
        scan(body.as_str(), spans, &with_mark(outer, link), out);
    } else if let (Some(body), Some(href)) = (caps.name("pipe_text"), caps.name("pipe_href")) {
        let link = Mark::Link {
            href: href.as_str().trim().to_string(),
        };
        scan(body.as_str(), spans, &with_mark(outer, link), out);
    } else if let Some(body) = caps.name("code") {
        // Code bodies are raw
        push_run(body.as_str(), with_mark(outer, Mark::Code), out);
    }
}

fn with_mark(outer: &[Mark], mark: Mark) -> Vec<Mark> {
    let mut marks = outer.to_vec();
    if !marks.contains(&mark) {
        marks.push(mark);
    }
    marks
}

fn push_run(value: &str, marks: Vec<Mark>, out: &mut Vec<Inline>) {
    if !value.is_empty() {
        out.push(Inline::marked(value, marks));
    }
}
