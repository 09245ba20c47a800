//! CLI Theme Command
//!
//! Shows or changes the saved light/dark preference.

use anyhow::Result;
use clap::Subcommand;
use narrate_config::Theme;

use crate::terminal_output::{note_info, Palette};
use crate::{CliContext, EXIT_OK};

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeAction {
    /// Print the effective theme and where it came from
    #[default]
    Show,
    /// Save the light theme
    Light,
    /// Save the dark theme
    Dark,
    /// Switch to the other theme and save it
    Toggle,
}

pub async fn run(ctx: &CliContext, action: ThemeAction) -> Result<u8> {
    let next = match action {
        ThemeAction::Show => {
            note_info(&ctx.palette, &describe_source(ctx));
            return Ok(EXIT_OK);
        }
        ThemeAction::Light => Theme::Light,
        ThemeAction::Dark => Theme::Dark,
        ThemeAction::Toggle => ctx.theme.toggled(),
    };

    ctx.theme_store.save(next).await?;
    // Confirm in the new theme's colors.
    let palette = if ctx.palette.is_plain() {
        Palette::plain()
    } else {
        Palette::for_theme(next, true)
    };
    note_info(&palette, &format!("Theme set to {next}"));
    Ok(EXIT_OK)
}

fn describe_source(ctx: &CliContext) -> String {
    let source = if ctx.saved_theme.is_some() {
        format!("saved in {}", ctx.theme_store.path().display())
    } else if ctx.config.default_theme().is_some() {
        "from ui.theme in config".to_string()
    } else {
        "from terminal background".to_string()
    };
    format!("Theme: {} ({source})", ctx.theme)
}
