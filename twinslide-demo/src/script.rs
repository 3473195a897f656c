//! Scripted input for the terminal demo.
//!
//! One command per line; `#` starts a comment.
//!
//! ```text
//! down 12        # pointer pressed at column 12
//! move 30
//! up 30
//! key right ctrl # key pressed, optionally with ctrl held
//! wait 500       # advance the clock, firing key repeats
//! keyup
//! focus
//! blur
//! resize 80
//! set 20 60      # host pushes new values and asks for a commit
//! show           # print the current frame
//! ```

use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use twinslide::{Px, RangeSliderController, RenderTarget, SliderKey};

/// One scripted step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    PointerDown(i32),
    PointerMove(i32),
    PointerUp(i32),
    KeyDown { key: SliderKey, ctrl: bool },
    KeyUp,
    Wait(Duration),
    Focus,
    Blur,
    Resize(i32),
    SetValues(f64, f64),
    Show,
}

/// Parses a whole script. Errors name the offending line.
pub fn parse(source: &str) -> anyhow::Result<Vec<Command>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.split('#').next().unwrap_or_default().trim();
            (!line.is_empty()).then_some((index + 1, line))
        })
        .map(|(number, line)| parse_line(line).with_context(|| format!("script line {number}")))
        .collect()
}

fn parse_line(line: &str) -> anyhow::Result<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let command = match verb {
        "down" => Command::PointerDown(column(words.next())?),
        "move" => Command::PointerMove(column(words.next())?),
        "up" => Command::PointerUp(column(words.next())?),
        "key" => {
            let key = match words.next() {
                Some("left") => SliderKey::Left,
                Some("right") => SliderKey::Right,
                Some("home") => SliderKey::Home,
                Some("end") => SliderKey::End,
                Some("space") => SliderKey::Space,
                Some(_) => SliderKey::Other,
                None => bail!("`key` needs a key name"),
            };
            let ctrl = match words.next() {
                Some("ctrl") => true,
                Some(other) => bail!("unknown key modifier `{other}`"),
                None => false,
            };
            Command::KeyDown { key, ctrl }
        }
        "keyup" => Command::KeyUp,
        "wait" => {
            let millis: u64 = words
                .next()
                .context("`wait` needs a duration in milliseconds")?
                .parse()
                .context("invalid duration")?;
            Command::Wait(Duration::from_millis(millis))
        }
        "focus" => Command::Focus,
        "blur" => Command::Blur,
        "resize" => Command::Resize(column(words.next())?),
        "set" => {
            let low = number(words.next())?;
            let high = number(words.next())?;
            Command::SetValues(low, high)
        }
        "show" => Command::Show,
        other => bail!("unknown command `{other}`"),
    };
    if let Some(extra) = words.next() {
        bail!("unexpected `{extra}` after `{verb}`");
    }
    Ok(command)
}

fn column(word: Option<&str>) -> anyhow::Result<i32> {
    word.context("missing column")?
        .parse::<i32>()
        .context("invalid column")
}

fn number(word: Option<&str>) -> anyhow::Result<f64> {
    word.context("missing value")?
        .parse::<f64>()
        .context("invalid value")
}

/// Replays commands against a slider on a synthetic clock.
#[derive(Debug)]
pub struct Player {
    now: Instant,
}

impl Player {
    pub fn new(start: Instant) -> Self {
        Self { now: start }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    /// Applies one command. Returns `true` when the caller should print a
    /// frame.
    pub fn apply<T, R>(
        &mut self,
        slider: &mut RangeSliderController<T>,
        command: Command,
        resize_target: R,
    ) -> bool
    where
        T: RenderTarget,
        R: FnOnce(&mut T, i32),
    {
        tracing::debug!(?command, "replaying");
        match command {
            Command::PointerDown(x) => slider.handle_pointer_down(Px(x)),
            Command::PointerMove(x) => slider.handle_pointer_move(Px(x)),
            Command::PointerUp(x) => slider.handle_pointer_up(Px(x)),
            Command::KeyDown { key, ctrl } => slider.handle_key_down_at(key, ctrl, self.now),
            Command::KeyUp => slider.handle_key_up_at(self.now),
            Command::Wait(duration) => self.advance(slider, duration),
            Command::Focus => slider.handle_focus(),
            Command::Blur => slider.handle_blur(),
            Command::Resize(width) => {
                resize_target(slider.target_mut(), width);
                let height = slider.target().client_size().height;
                slider.handle_resize(Px(width), height);
            }
            Command::SetValues(low, high) => slider.set_current_values(low, high, true),
            Command::Show => return true,
        }
        false
    }

    /// Moves the clock forward, firing every repeat deadline on the way.
    fn advance<T: RenderTarget>(
        &mut self,
        slider: &mut RangeSliderController<T>,
        duration: Duration,
    ) {
        let end = self.now + duration;
        while let Some(deadline) = slider.next_repeat_deadline() {
            if deadline > end {
                break;
            }
            self.now = self.now.max(deadline);
            slider.tick(self.now);
            if slider.next_repeat_deadline() == Some(self.now) {
                tracing::warn!("zero repeat delay, stopping the clock early");
                break;
            }
        }
        self.now = end;
    }
}
