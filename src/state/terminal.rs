// Terminal typing animation engine.
// A two-phase typewriter state machine advanced by due-time ticks, plus the
// colorization pass applied to every rendered output prefix.

use std::time::{Duration, Instant};

use super::script::TerminalScript;

/// Delay before the first character after a run is (re)started.
pub const START_DELAY: Duration = Duration::from_millis(200);
/// Per-character delay while typing a command.
pub const COMMAND_CHAR_DELAY: Duration = Duration::from_millis(20);
/// Pause between a completed command and the start of its output.
pub const POST_COMMAND_PAUSE: Duration = Duration::from_millis(150);
/// Per-character delay while typing output. Faster than command typing.
pub const OUTPUT_CHAR_DELAY: Duration = Duration::from_millis(10);
/// Pause after a block's output before the next command (or the cursor).
pub const INTER_BLOCK_PAUSE: Duration = Duration::from_millis(250);

/// Style classification of a piece of rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Plain,
    /// Body of a `* commit` line.
    Commit,
    /// A complete `(HEAD...)` reference.
    Head,
    /// A complete `(tag:...)` reference.
    Tag,
    /// A literal pipe on a non-commit line.
    Pipe,
}

/// A run of characters sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    fn new(kind: SegmentKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// One visual line of colorized output.
pub type ColorLine = Vec<Segment>;

/// Colorize a (possibly partial) output string, line by line.
pub fn colorize_output(text: &str) -> Vec<ColorLine> {
    text.split('\n').map(colorize_line).collect()
}

fn colorize_line(line: &str) -> ColorLine {
    if line.starts_with("* commit") {
        colorize_commit_line(line)
    } else {
        colorize_pipe_line(line)
    }
}

/// A commit line is colored whole, with complete `(HEAD...)` and `(tag:...)`
/// spans overriding their ranges in first-appearance order. Pipes inside a
/// commit line are not wrapped separately.
fn colorize_commit_line(line: &str) -> ColorLine {
    let mut marks: Vec<(usize, usize, SegmentKind)> = Vec::new();
    if let Some((start, end)) = find_paren_token(line, "(HEAD") {
        marks.push((start, end, SegmentKind::Head));
    }
    if let Some((start, end)) = find_paren_token(line, "(tag:") {
        marks.push((start, end, SegmentKind::Tag));
    }
    marks.sort_by_key(|mark| mark.0);

    let mut segments = Vec::new();
    let mut pos = 0;
    for (start, end, kind) in marks {
        if start < pos {
            continue;
        }
        if start > pos {
            segments.push(Segment::new(SegmentKind::Commit, &line[pos..start]));
        }
        segments.push(Segment::new(kind, &line[start..end]));
        pos = end;
    }
    if pos < line.len() || segments.is_empty() {
        segments.push(Segment::new(SegmentKind::Commit, &line[pos..]));
    }
    segments
}

/// Every other line has each literal pipe wrapped individually.
fn colorize_pipe_line(line: &str) -> ColorLine {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    for (idx, ch) in line.char_indices() {
        if ch == '|' {
            if idx > plain_start {
                segments.push(Segment::new(SegmentKind::Plain, &line[plain_start..idx]));
            }
            segments.push(Segment::new(SegmentKind::Pipe, "|"));
            plain_start = idx + 1;
        }
    }
    if plain_start < line.len() {
        segments.push(Segment::new(SegmentKind::Plain, &line[plain_start..]));
    }
    segments
}

/// Locate a parenthesized token starting with `open`, complete up to its
/// closing paren. Returns byte offsets. A token still missing its closing
/// paren (mid-typing) is not found.
fn find_paren_token(line: &str, open: &str) -> Option<(usize, usize)> {
    let start = line.find(open)?;
    let close = line[start..].find(')')? + start;
    Some((start, close + 1))
}

/// A scheduled continuation of one run. Carries the generation it was issued
/// under; an advance with a stale generation is a no-op, so continuations
/// from a superseded run can fire harmlessly.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    due: Instant,
    generation: u64,
}

impl Tick {
    pub fn due(&self) -> Instant {
        self.due
    }
}

/// A rendered block of the terminal viewport.
#[derive(Debug, Clone)]
pub enum TermBlock {
    /// A prompt line with the command typed so far.
    Command(String),
    /// Colorized lines of the output prefix typed so far.
    Output(Vec<ColorLine>),
    /// The persistent blinking cursor appended once the run completes.
    Cursor,
}

/// Two-phase typewriter over a [`TerminalScript`].
///
/// Per block: type the command one character per tick, pause, then type the
/// output one character per tick (re-colorizing the whole visible prefix each
/// time), pause, move to the next block. After the last block a cursor marker
/// is appended and the run is done until an explicit restart.
pub struct TypingEngine {
    script: TerminalScript,
    rendered: Vec<TermBlock>,
    block_idx: usize,
    char_idx: usize,
    typing_command: bool,
    done: bool,
    started: bool,
    generation: u64,
}

impl TypingEngine {
    pub fn new(script: TerminalScript) -> Self {
        Self {
            script,
            rendered: Vec::new(),
            block_idx: 0,
            char_idx: 0,
            typing_command: true,
            done: false,
            started: false,
            generation: 0,
        }
    }

    /// Begin a run with the current script. Any tick from an earlier run
    /// becomes stale.
    pub fn start(&mut self, now: Instant) -> Tick {
        self.begin(now)
    }

    /// Reset and begin a run with a new script (language switch).
    pub fn restart(&mut self, script: TerminalScript, now: Instant) -> Tick {
        self.script = script;
        self.begin(now)
    }

    fn begin(&mut self, now: Instant) -> Tick {
        self.rendered.clear();
        self.block_idx = 0;
        self.char_idx = 0;
        self.typing_command = true;
        self.done = false;
        self.started = true;
        self.generation += 1;
        Tick {
            due: now + START_DELAY,
            generation: self.generation,
        }
    }

    /// Perform one transition. Returns the next tick, or `None` when the run
    /// completed or `tick` belongs to a superseded run.
    pub fn advance(&mut self, tick: &Tick, now: Instant) -> Option<Tick> {
        if tick.generation != self.generation || self.done {
            return None;
        }

        if self.block_idx >= self.script.blocks.len() {
            self.rendered.push(TermBlock::Cursor);
            self.done = true;
            return None;
        }

        let block = self.script.blocks[self.block_idx].clone();
        let delay = if self.typing_command {
            if self.char_idx == 0 {
                self.rendered.push(TermBlock::Command(String::new()));
            }
            let len = block.command.chars().count();
            if self.char_idx < len {
                if let (Some(TermBlock::Command(text)), Some(ch)) = (
                    self.rendered.last_mut(),
                    block.command.chars().nth(self.char_idx),
                ) {
                    text.push(ch);
                }
                self.char_idx += 1;
                COMMAND_CHAR_DELAY
            } else {
                self.typing_command = false;
                self.char_idx = 0;
                POST_COMMAND_PAUSE
            }
        } else {
            if self.char_idx == 0 {
                self.rendered.push(TermBlock::Output(Vec::new()));
            }
            let len = block.output.chars().count();
            if self.char_idx < len {
                let prefix: String = block.output.chars().take(self.char_idx + 1).collect();
                if let Some(TermBlock::Output(lines)) = self.rendered.last_mut() {
                    *lines = colorize_output(&prefix);
                }
                self.char_idx += 1;
                OUTPUT_CHAR_DELAY
            } else {
                self.typing_command = true;
                self.char_idx = 0;
                self.block_idx += 1;
                INTER_BLOCK_PAUSE
            }
        };

        Some(Tick {
            due: now + delay,
            generation: self.generation,
        })
    }

    pub fn blocks(&self) -> &[TermBlock] {
        &self.rendered
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Plain text of everything rendered so far, one line per block line.
    /// The cursor marker contributes nothing.
    pub fn rendered_text(&self) -> String {
        let mut text = String::new();
        for block in &self.rendered {
            match block {
                TermBlock::Command(command) => {
                    text.push_str(command);
                    text.push('\n');
                }
                TermBlock::Output(lines) => {
                    for (idx, line) in lines.iter().enumerate() {
                        if idx > 0 {
                            text.push('\n');
                        }
                        for segment in line {
                            text.push_str(&segment.text);
                        }
                    }
                    text.push('\n');
                }
                TermBlock::Cursor => {}
            }
        }
        text
    }
}
