use std::{
	io::Write,
	time::{Duration, Instant},
};

const LABEL_WIDTH: usize = 16;
const REDRAW: Duration = Duration::from_millis(100);
const FULL: char = '█';
const PARTIAL: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

fn terminal_width() -> usize {
	termsize::get().map_or(80, |size| size.cols as usize)
}

/// `name:` padded to a fixed column, then the elapsed time as `[hh:mm:ss]`.
fn label(name: &str, elapsed: Duration) -> String {
	let seconds = elapsed.as_secs();
	format!(
		"{:<width$}[{:02}:{:02}:{:02}]",
		format!("{}:", name),
		seconds / 3600,
		seconds / 60 % 60,
		seconds % 60,
		width = LABEL_WIDTH,
	)
}

/// Exactly `width` cells, filled to `done / goal` in eighths of a cell.
fn bar(done: usize, goal: usize, width: usize) -> String {
	let eighths = width * PARTIAL.len();
	let filled = if goal == 0 {
		eighths
	} else {
		done.min(goal) * eighths / goal
	};
	let full = filled / PARTIAL.len();

	let mut bar = std::iter::repeat(FULL).take(full).collect::<String>();
	if full < width {
		bar.push(PARTIAL[filled % PARTIAL.len()]);
		bar.extend(std::iter::repeat(' ').take(width - full - 1));
	}
	bar
}

fn flush() {
	std::io::stdout().flush().ok();
}

/// Progress bar over a known number of steps, redrawn at most every 100ms.
pub struct Progress<'a> {
	name: &'a str,
	goal: usize,
	done: usize,
	start: Instant,
	drawn: Instant,
}

impl<'a> Progress<'a> {
	pub fn new(name: &'a str, goal: usize) -> Self {
		let start = Instant::now();
		let progress = Self { name, goal, done: 0, start, drawn: start };
		progress.draw();
		progress
	}

	pub fn step(&mut self) {
		self.done += 1;
		if self.drawn.elapsed() > REDRAW {
			self.drawn = Instant::now();
			self.draw();
		}
	}

	fn line(&self) -> String {
		let width = terminal_width().saturating_sub(LABEL_WIDTH + 14).max(10);
		format!(
			"{} |{}|",
			label(self.name, self.start.elapsed()),
			bar(self.done, self.goal, width)
		)
	}

	fn draw(&self) {
		print!("{}\r", self.line());
		flush();
	}

	/// Draws the full bar and returns the elapsed seconds.
	pub fn finish(mut self) -> f32 {
		self.done = self.goal;
		self.draw();
		println!();
		self.start.elapsed().as_secs_f32()
	}
}

/// Single step without measurable progress.
pub struct Stage<'a> {
	name: &'a str,
	start: Instant,
}

impl<'a> Stage<'a> {
	pub fn new(name: &'a str) -> Self {
		print!("{} ...\r", label(name, Duration::ZERO));
		flush();
		Self { name, start: Instant::now() }
	}

	/// Returns the elapsed seconds.
	pub fn finish(self) -> f32 {
		let elapsed = self.start.elapsed();
		println!("{} done", label(self.name, elapsed));
		elapsed.as_secs_f32()
	}
}
