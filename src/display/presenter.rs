//! Image viewer strategies, tried in order until one succeeds.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::config::{Environment, ImageSize};

/// Placeholder shown when no viewer can display the image
pub const ASCII_ART: &str = r"
    ╭─────────────────────────╮
    │      (◕‿◕)              │
    │      /|\                │
    │      / \                │
    │                         │
    │   Holding a Programming │
    │   Book! 📚              │
    │                         │
    │   🎀  Anime Girl  🎀    │
    ╰─────────────────────────╯
";

/// One way of putting an image on the terminal
pub trait Presenter {
    /// Short name for logs and `--viewers`
    fn name(&self) -> &'static str;

    /// External program this strategy runs, if any
    fn program(&self) -> Option<&'static str> {
        None
    }

    /// Try to show the image; `false` lets the next strategy have a go
    fn try_display(&self, path: &Path) -> bool;
}

/// The default strategy chain, most capable first
pub fn default_chain(size: ImageSize, env: &Environment) -> Vec<Box<dyn Presenter>> {
    vec![
        Box::new(Chafa::new(size)),
        Box::new(Imgcat),
        Box::new(KittyIcat),
        Box::new(InlineImage::new(env.supports_inline_images())),
        Box::new(AsciiArt),
    ]
}

/// Names of the external viewers of `chain` found on the search path
pub fn available_viewers(chain: &[Box<dyn Presenter>], env: &Environment) -> Vec<&'static str> {
    chain
        .iter()
        .filter(|p| p.program().is_some_and(|prog| env.find_program(prog).is_some()))
        .map(|p| p.name())
        .collect()
}

/// Run a viewer with inherited stdout/stderr, true on a zero exit
fn run_viewer(program: &str, args: &[&str]) -> bool {
    match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .status()
    {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::debug!("{program} unavailable: {e}");
            false
        }
    }
}

/// `chafa`, tried with progressively simpler sizes
pub struct Chafa {
    fallback_size: ImageSize,
}

impl Chafa {
    /// Use `fallback_size` when the terminal-derived size fails
    pub const fn new(fallback_size: ImageSize) -> Self {
        Self { fallback_size }
    }

    /// A third of the terminal, leaving room for the info block
    pub fn size_for_terminal(columns: u16, rows: u16) -> ImageSize {
        ImageSize {
            width: (columns.saturating_sub(4) / 3).clamp(12, 40),
            height: (rows.saturating_sub(6) / 3).clamp(6, 20),
        }
    }

    /// `--size` values and extra flags, in the order they are tried
    fn attempts(&self, terminal: ImageSize) -> Vec<(String, &'static [&'static str])> {
        const RGB: &[&str] = &["--dither", "none", "--color-space", "rgb"];
        const ORDERED: &[&str] = &["--dither", "ordered"];

        vec![
            (terminal.to_string(), RGB),
            (self.fallback_size.to_string(), ORDERED),
            ("30".to_string(), RGB),
            ("20".to_string(), RGB),
        ]
    }
}

impl Presenter for Chafa {
    fn name(&self) -> &'static str {
        "chafa"
    }

    fn program(&self) -> Option<&'static str> {
        Some("chafa")
    }

    fn try_display(&self, path: &Path) -> bool {
        let (columns, rows) = crossterm::terminal::size().unwrap_or((80, 40));
        let terminal = Self::size_for_terminal(columns, rows);
        let path = path.to_string_lossy();

        self.attempts(terminal).into_iter().any(|(size, extra)| {
            let mut args = vec!["--size", size.as_str(), "--symbols", "block", "--colors", "256"];
            args.extend_from_slice(extra);
            args.push(&*path);
            run_viewer("chafa", &args)
        })
    }
}

/// iTerm2's `imgcat`
pub struct Imgcat;

impl Presenter for Imgcat {
    fn name(&self) -> &'static str {
        "imgcat"
    }

    fn program(&self) -> Option<&'static str> {
        Some("imgcat")
    }

    fn try_display(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        run_viewer("imgcat", &[&*path])
    }
}

/// kitty's `icat` kitten
pub struct KittyIcat;

impl Presenter for KittyIcat {
    fn name(&self) -> &'static str {
        "kitty icat"
    }

    fn program(&self) -> Option<&'static str> {
        Some("kitty")
    }

    fn try_display(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        run_viewer("kitty", &["+kitten", "icat", &*path])
    }
}

/// iTerm2 inline image escape sequence, written directly to stdout
pub struct InlineImage {
    enabled: bool,
}

impl InlineImage {
    /// `enabled` should reflect whether the terminal understands the protocol
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Build the escape sequence carrying `data`
    pub fn escape_sequence(data: &[u8]) -> String {
        format!(
            "\x1b]1337;File=inline=1;size={};preserveAspectRatio=1:{}\x07",
            data.len(),
            STANDARD.encode(data)
        )
    }
}

impl Presenter for InlineImage {
    fn name(&self) -> &'static str {
        "inline image protocol"
    }

    fn try_display(&self, path: &Path) -> bool {
        if !self.enabled {
            return false;
        }

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Cannot read {}: {e}", path.display());
                return false;
            }
        };

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", Self::escape_sequence(&data)).is_ok() && stdout.flush().is_ok()
    }
}

/// Boxed ASCII placeholder; always succeeds
pub struct AsciiArt;

impl Presenter for AsciiArt {
    fn name(&self) -> &'static str {
        "ascii art"
    }

    fn try_display(&self, _path: &Path) -> bool {
        print!("{ASCII_ART}");
        true
    }
}
