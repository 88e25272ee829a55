use crate::extract::ColorRectangles;

/// Per-run resource limits of the target processors, shared by all tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum instruction lines a processor executes per scheduling quantum.
    pub instruction_budget: u32,
    /// Maximum queued drawing operations a display holds before a flush.
    pub buffer_slots: u32,
}

/// What the encoder must do before emitting the next instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushAction {
    /// Emit into the current block as-is.
    Keep,
    /// Close the current block with a flush and re-assert the color in a new block.
    SplitBlock,
    /// Append a flush and color re-assertion inside the current block.
    InlineFlush,
}

/// Dual-counter flush state machine: tracks instruction lines and draw calls
/// emitted since the last flush, and decides per pending instruction whether a
/// flush must precede it.
///
/// The instruction-budget check runs first and the buffer-slot check second;
/// the two branches are mutually exclusive per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushGate {
    lines_since_flush: u32,
    draw_calls_since_flush: u32,
}

impl FlushGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one pending instruction. Counter state after a flush accounts for
    /// the re-asserted color line that carries color state across the boundary.
    pub fn admit(&mut self, limits: &ResourceLimits) -> FlushAction {
        if self.lines_since_flush + 2 >= limits.instruction_budget {
            // The next block opens with the re-asserted color line.
            self.lines_since_flush = 1;
            self.draw_calls_since_flush = 1;
            FlushAction::SplitBlock
        } else {
            self.draw_calls_since_flush += 1;
            if self.draw_calls_since_flush >= limits.buffer_slots {
                // Flush and re-assert are appended in place, two lines.
                self.lines_since_flush += 2;
                self.draw_calls_since_flush = 1;
                FlushAction::InlineFlush
            } else {
                FlushAction::Keep
            }
        }
    }

    /// Record the pending instruction actually emitted into the current block.
    pub fn record_line(&mut self) {
        self.lines_since_flush += 1;
    }
}

/// An ordered run of instruction lines; the last line is always a flush
/// naming the tile's display link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionBlock {
    lines: Vec<String>,
}

impl InstructionBlock {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// The complete instruction stream for one tile: an ordered block sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileProgram {
    blocks: Vec<InstructionBlock>,
}

impl TileProgram {
    pub fn blocks(&self) -> &[InstructionBlock] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The program blob: block texts joined by a blank separating line.
    pub fn source(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Encode one tile's color→rectangles mapping into budget-bounded instruction
/// blocks, flushing to `flush_target`.
///
/// Rectangle coordinates arrive in top-left-origin pixel space; the display
/// surface is bottom-left-origin, so the vertical position is flipped as
/// `display_size - y - height`. Limits are checked before every emission but
/// never reject an instruction; an empty mapping yields an empty program.
pub fn build_program(
    colors: &ColorRectangles,
    limits: &ResourceLimits,
    flush_target: &str,
    display_size: u32,
) -> TileProgram {
    let mut stream = Stream::new(flush_target);

    for (color, rects) in colors.iter() {
        let select = color.select_line();
        if stream.admit(limits, &select) == FlushAction::Keep {
            stream.push_line(select.clone());
        }
        for rect in rects {
            stream.admit(limits, &select);
            let flipped_y = display_size as i64 - rect.y as i64 - rect.height as i64;
            stream.push_line(format!(
                "draw rect {} {} {} {}",
                rect.x, flipped_y, rect.width, rect.height
            ));
        }
    }

    stream.finish()
}

/// Block-in-progress state for one tile's encoding pass.
struct Stream<'a> {
    blocks: Vec<InstructionBlock>,
    current: Vec<String>,
    gate: FlushGate,
    flush_target: &'a str,
}

impl<'a> Stream<'a> {
    fn new(flush_target: &'a str) -> Self {
        Self {
            blocks: Vec::new(),
            current: Vec::new(),
            gate: FlushGate::new(),
            flush_target,
        }
    }

    fn flush_line(&self) -> String {
        format!("drawflush {}", self.flush_target)
    }

    /// Run the budget check for one pending instruction and apply the
    /// resulting block surgery. Returns the action so callers can tell whether
    /// the current color line was already re-asserted.
    fn admit(&mut self, limits: &ResourceLimits, color_line: &str) -> FlushAction {
        let action = self.gate.admit(limits);
        match action {
            FlushAction::Keep => {}
            FlushAction::SplitBlock => {
                let flush = self.flush_line();
                self.current.push(flush);
                self.blocks.push(InstructionBlock {
                    lines: std::mem::take(&mut self.current),
                });
                self.current.push(color_line.to_string());
            }
            FlushAction::InlineFlush => {
                let flush = self.flush_line();
                self.current.push(flush);
                self.current.push(color_line.to_string());
            }
        }
        action
    }

    fn push_line(&mut self, line: String) {
        self.current.push(line);
        self.gate.record_line();
    }

    fn finish(mut self) -> TileProgram {
        if !self.current.is_empty() {
            let flush = self.flush_line();
            self.current.push(flush);
            self.blocks.push(InstructionBlock {
                lines: self.current,
            });
        }
        TileProgram {
            blocks: self.blocks,
        }
    }
}
