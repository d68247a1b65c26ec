//! Terminal output: the image (through a chain of viewers) and the info block

pub mod presenter;

use std::path::Path;

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use crate::system::SystemInfo;

pub use presenter::{AsciiArt, Presenter, available_viewers, default_chain};

/// Prints the image and system information
pub struct Renderer {
    show_image: bool,
    presenters: Vec<Box<dyn Presenter>>,
}

impl Renderer {
    /// Create a renderer trying `presenters` in order
    pub fn new(show_image: bool, presenters: Vec<Box<dyn Presenter>>) -> Self {
        Self {
            show_image,
            presenters,
        }
    }

    /// Print the image (or a placeholder) followed by the info block.
    ///
    /// `image` is `None` when no image could be resolved.
    pub fn display_info(&self, info: &SystemInfo, image: Option<&Path>) {
        if self.show_image {
            let shown = image.is_some_and(|path| self.display_image(path));
            if !shown {
                AsciiArt.try_display(Path::new(""));
            }
        }

        for line in info_lines(info) {
            println!("{line}");
        }
    }

    /// Run the presenter chain, true once a strategy succeeds
    pub fn display_image(&self, path: &Path) -> bool {
        let shown = self.presenters.iter().find(|p| p.try_display(path));
        match shown {
            Some(presenter) => {
                tracing::debug!("Displayed {} with {}", path.display(), presenter.name());
                true
            }
            None => false,
        }
    }

    /// Whether images are shown at all
    pub const fn shows_image(&self) -> bool {
        self.show_image
    }

    /// Print an error in red on stderr
    pub fn display_error(&self, message: &str) {
        eprintln!("{}", format!("Error: {message}").red());
    }

    /// Print a success message in green
    pub fn display_success(&self, message: &str) {
        println!("{}", message.green());
    }
}

/// Styled lines of the info block: header, separator, labelled rows
pub fn info_lines(info: &SystemInfo) -> Vec<String> {
    let separator = "─".repeat(UnicodeWidthStr::width(info.user.as_str()))
        + "─"
        + &"─".repeat(UnicodeWidthStr::width(info.hostname.as_str()));

    let mut lines = vec![
        format!(
            "{}{}{}",
            info.user.as_str().bold().green(),
            "@".bold(),
            info.hostname.as_str().bold().blue()
        ),
        separator,
    ];

    lines.extend(
        info.rows()
            .iter()
            .map(|(label, value)| format!("{} {}", format!("{label}:").bold(), value.yellow())),
    );

    lines
}
