// SPDX-License-Identifier: Apache-2.0

//! Line-level Markdown scanning: level-2 headings and fenced blocks.
//!
//! A fence opens on a line made of three or more backticks followed by an
//! optional info string without backticks. The exact backtick run recorded at
//! open closes the block on the first line starting with it. A fence that is
//! never closed yields no block, and the lines after its opener are scanned
//! as ordinary text.

const H2_MARKER: &str = "## ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Text(&'a str),
    FenceOpen,
    FenceBody(&'a str),
    FenceClose,
}

fn fence_open(line: &str) -> Option<&str> {
    let run = line.bytes().take_while(|b| *b == b'`').count();
    if run < 3 || line[run..].contains('`') {
        return None;
    }
    Some(&line[..run])
}

fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Classifies `lines` onto `out`. Returns the index of a fence opener that is
/// still open at the end.
fn scan<'a>(lines: &[&'a str], out: &mut Vec<Line<'a>>) -> Option<usize> {
    let mut fence: Option<(usize, &str)> = None;
    for (index, line) in lines.iter().copied().enumerate() {
        match fence {
            None => match fence_open(line) {
                Some(run) => {
                    fence = Some((index, run));
                    out.push(Line::FenceOpen);
                }
                None => out.push(Line::Text(line)),
            },
            Some((_, run)) if line.starts_with(run) => {
                fence = None;
                out.push(Line::FenceClose);
            }
            Some(_) => out.push(Line::FenceBody(line)),
        }
    }
    fence.map(|(open_at, _)| open_at)
}

fn classify(text: &str) -> Vec<Line<'_>> {
    let lines = split_lines(text);
    let mut out = Vec::with_capacity(lines.len());
    let mut start = 0;
    // A dangling fence is not a block: everything after its opener is rescanned.
    while let Some(open_at) = scan(&lines[start..], &mut out) {
        let opener = start + open_at;
        out.truncate(opener);
        out.push(Line::Text(lines[opener]));
        start = opener + 1;
    }
    out
}

/// Level-2 heading lines outside fenced blocks, trailing whitespace removed,
/// in document order.
pub fn extract_h2_headings(text: &str) -> Vec<String> {
    classify(text)
        .into_iter()
        .filter_map(|line| match line {
            Line::Text(raw) => {
                let trimmed = raw.trim_end();
                trimmed.starts_with(H2_MARKER).then(|| trimmed.to_string())
            }
            _ => None,
        })
        .collect()
}

/// Bodies of closed fenced blocks, interior lines joined with `\n`.
pub fn extract_fenced_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in classify(text) {
        match line {
            Line::FenceOpen => current.clear(),
            Line::FenceBody(body) => current.push(body),
            Line::FenceClose => blocks.push(current.join("\n")),
            Line::Text(_) => {}
        }
    }
    blocks
}
