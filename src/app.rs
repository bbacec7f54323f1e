//! Command-line front end
//!
//! `capture` runs the external screenshot program (after an optional
//! countdown), `annotate` edits an existing image, and both finish by
//! saving and/or copying the flattened result.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::capture::{self, CaptureMode, CaptureOptions, CaptureProvider, CommandCapture};
use crate::clipboard::{self, ClipboardProvider, CommandClipboard};
use crate::config::{AppConfig, RgbaColor, StrokeWidth, Tool};
use crate::countdown::{self, CountdownEvent};
use crate::output;
use crate::session::script::Script;
use crate::session::{EditSession, ToolSettings};

#[derive(Parser, Debug)]
#[command(
    name = "snipmark",
    version,
    about = "Take a screenshot, annotate it, then save it or copy it to the clipboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture the screen with the external screenshot program
    Capture(CaptureArgs),
    /// Annotate an existing image
    Annotate(AnnotateArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// rectangle, freeform, window or fullscreen
    #[arg(long)]
    pub mode: Option<CaptureMode>,
    /// Seconds to wait before capturing (0-10)
    #[arg(long)]
    pub delay: Option<u32>,
    /// Include the mouse pointer
    #[arg(long, action = ArgAction::SetTrue)]
    pub include_cursor: bool,
    /// Copy the unedited capture to the clipboard
    #[arg(long, action = ArgAction::SetTrue)]
    pub copy_raw: bool,
    #[command(flatten)]
    pub edit: EditArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Image to annotate
    pub image: PathBuf,
    #[command(flatten)]
    pub edit: EditArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the effective configuration to the config file
    #[arg(long, action = ArgAction::SetTrue)]
    pub write: bool,
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Gesture script (JSON) replayed onto the image
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Initial tool: pen, marker, eraser, rectangle, ellipse, arrow
    #[arg(long)]
    pub tool: Option<Tool>,
    /// Initial color (#rrggbb or #rrggbbaa)
    #[arg(long)]
    pub color: Option<RgbaColor>,
    /// Initial stroke width (clamped to 1-20)
    #[arg(long)]
    pub width: Option<u32>,
}

impl EditArgs {
    /// Config defaults overridden by command-line flags
    pub fn settings(&self, config: &AppConfig) -> ToolSettings {
        let mut settings = ToolSettings::from(config);
        if let Some(tool) = self.tool {
            settings.tool = tool;
        }
        if let Some(color) = self.color {
            settings.color = color;
        }
        if let Some(width) = self.width {
            settings.width = StrokeWidth::new(width);
        }
        settings
    }
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Save to this path (.png or .jpg)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Save with a generated name in the configured location
    #[arg(long, action = ArgAction::SetTrue)]
    pub save: bool,
    /// Pick the destination with a file dialog
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "output")]
    pub dialog: bool,
    /// Copy the annotated image to the clipboard
    #[arg(long, action = ArgAction::SetTrue)]
    pub copy: bool,
}

/// Where the annotated image should be written, if anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
enum SaveTarget {
    Path(PathBuf),
    Dialog,
    None,
}

impl OutputArgs {
    fn target(&self, config: &AppConfig) -> Result<SaveTarget> {
        if let Some(path) = &self.output {
            return Ok(SaveTarget::Path(path.clone()));
        }
        if self.dialog {
            return Ok(SaveTarget::Dialog);
        }
        // Without any output flag the result would be lost, so save by default
        if self.save || !self.copy {
            let path = output::get_img_path(config.save_location)
                .context("Could not determine a save location")?;
            return Ok(SaveTarget::Path(path));
        }
        Ok(SaveTarget::None)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load();
    match cli.command {
        Commands::Capture(args) => capture(&config, args).await,
        Commands::Annotate(args) => annotate(&config, args),
        Commands::Config(args) => show_config(&config, args),
    }
}

async fn capture(config: &AppConfig, args: CaptureArgs) -> Result<()> {
    let provider = Arc::new(CommandCapture::new(config.capture_program.clone()));
    let clipboard = CommandClipboard::new(config.clipboard_program.clone());
    capture_with(config, args, provider, &clipboard).await
}

/// Countdown, capture, then edit and output, with the external programs
/// supplied by the caller
async fn capture_with(
    config: &AppConfig,
    args: CaptureArgs,
    provider: Arc<dyn CaptureProvider>,
    clipboard: &dyn ClipboardProvider,
) -> Result<()> {
    let mode = args.mode.unwrap_or(config.capture_mode);
    let delay = args.delay.unwrap_or(config.delay).min(AppConfig::MAX_DELAY);
    log::info!("Taking screenshot in mode {} (delay {}s)", mode, delay);

    wait_for_countdown(delay, print_countdown).await?;

    let options = CaptureOptions {
        include_cursor: args.include_cursor || config.include_cursor,
    };
    // The capture program blocks until the user has picked a region
    let captured = tokio::task::spawn_blocking(move || {
        capture::capture_to_temp(provider.as_ref(), mode, &options)
    })
    .await
    .context("Capture task failed")??;

    if args.copy_raw {
        clipboard::copy_file(clipboard, captured.path())?;
    }

    let mut session = EditSession::open(captured.path(), args.edit.settings(config))?;
    edit_and_output(config, &mut session, &args.edit, &args.output, clipboard)
}

fn annotate(config: &AppConfig, args: AnnotateArgs) -> Result<()> {
    let clipboard = CommandClipboard::new(config.clipboard_program.clone());
    let mut session = EditSession::open(&args.image, args.edit.settings(config))?;
    edit_and_output(config, &mut session, &args.edit, &args.output, &clipboard)
}

/// Wait out the capture delay. Zero seconds is due immediately: no timer runs
/// and no events are delivered.
async fn wait_for_countdown<F>(seconds: u32, on_event: F) -> Result<()>
where
    F: FnMut(CountdownEvent) + Send + 'static,
{
    if seconds == 0 {
        return Ok(());
    }
    eprintln!("{seconds}");
    let handle = countdown::start(seconds, Duration::from_secs(1), on_event);
    if !handle.wait().await {
        anyhow::bail!("Countdown was cancelled");
    }
    Ok(())
}

fn print_countdown(event: CountdownEvent) {
    match event {
        CountdownEvent::Tick(0) => {}
        CountdownEvent::Tick(left) => eprintln!("{left}"),
        CountdownEvent::Finished => log::debug!("Countdown finished"),
    }
}

fn edit_and_output(
    config: &AppConfig,
    session: &mut EditSession,
    edit: &EditArgs,
    out: &OutputArgs,
    clipboard: &dyn ClipboardProvider,
) -> Result<()> {
    log::info!(
        "Editing {}x{} screenshot",
        session.base().width(),
        session.base().height()
    );
    if let Some(path) = &edit.script {
        Script::load(path)?.replay(session);
    }

    let saved = match out.target(config)? {
        SaveTarget::Path(path) => Some(path),
        SaveTarget::Dialog => {
            let picked = output::pick_save_path(config.save_location);
            if picked.is_none() {
                log::info!("Save dialog cancelled");
            }
            picked
        }
        SaveTarget::None => None,
    };
    if let Some(path) = &saved {
        session
            .save(path)
            .inspect_err(|e| log::error!("Failed to save screenshot: {:#}", e))?;
        println!("Saved screenshot to {}", path.display());
    }

    if out.copy || (saved.is_some() && config.copy_to_clipboard_on_save) {
        session
            .copy_to_clipboard(clipboard)
            .inspect_err(|e| log::error!("Failed to copy screenshot: {:#}", e))?;
        println!("Copied screenshot to clipboard");
    }
    Ok(())
}

fn show_config(config: &AppConfig, args: ConfigArgs) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if args.write {
        let path = config.save()?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Writes fixed bytes to the capture destination
    struct FakeCapture {
        bytes: Vec<u8>,
        calls: Mutex<usize>,
    }

    impl FakeCapture {
        fn writing(bytes: Vec<u8>) -> Arc<Self> {
            Arc::new(Self {
                bytes,
                calls: Mutex::new(0),
            })
        }

        fn white_png(width: u32, height: u32) -> Arc<Self> {
            let mut png = Vec::new();
            let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
            output::write_png(&mut png, &img).unwrap();
            Self::writing(png)
        }
    }

    impl CaptureProvider for FakeCapture {
        fn capture(&self, _: CaptureMode, _: &CaptureOptions, dest: &Path) -> Result<()> {
            *self.calls.lock().unwrap() += 1;
            std::fs::write(dest, &self.bytes)?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingClipboard {
        copies: Mutex<usize>,
    }

    impl ClipboardProvider for CountingClipboard {
        fn copy_png(&self, _: &Path) -> Result<()> {
            *self.copies.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn capture_args(delay: u32, output: PathBuf) -> CaptureArgs {
        CaptureArgs {
            mode: Some(CaptureMode::Fullscreen),
            delay: Some(delay),
            include_cursor: false,
            copy_raw: false,
            edit: EditArgs::default(),
            output: OutputArgs {
                output: Some(output),
                ..OutputArgs::default()
            },
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<CountdownEvent>>>, impl FnMut(CountdownEvent) + Send + 'static) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        (events, move |e| sink.lock().unwrap().push(e))
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_is_due_immediately() {
        let (events, sink) = recorder();
        let begin = Instant::now();
        wait_for_countdown(0, sink).await.unwrap();
        assert_eq!(begin.elapsed(), Duration::ZERO);
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_counts_down_first() {
        let (events, sink) = recorder();
        let begin = Instant::now();
        wait_for_countdown(2, sink).await.unwrap();
        assert_eq!(begin.elapsed(), Duration::from_secs(2));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                CountdownEvent::Tick(1),
                CountdownEvent::Tick(0),
                CountdownEvent::Finished,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_without_delay_saves_right_away() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("shot.png");
        let provider = FakeCapture::white_png(6, 4);
        let clipboard = CountingClipboard::default();
        let mut args = capture_args(0, out_path.clone());
        args.copy_raw = true;

        let begin = Instant::now();
        capture_with(&AppConfig::default(), args, provider.clone(), &clipboard)
            .await
            .unwrap();

        assert_eq!(begin.elapsed(), Duration::ZERO);
        assert_eq!(*provider.calls.lock().unwrap(), 1);
        assert_eq!(*clipboard.copies.lock().unwrap(), 1);
        let saved = image::open(&out_path).unwrap();
        assert_eq!((saved.width(), saved.height()), (6, 4));
    }

    #[tokio::test]
    async fn test_empty_capture_opens_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("shot.png");
        let clipboard = CountingClipboard::default();
        let mut args = capture_args(0, out_path.clone());
        args.output.copy = true;

        let err = capture_with(&AppConfig::default(), args, FakeCapture::writing(Vec::new()), &clipboard)
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("could not be created"));
        assert!(!out_path.exists());
        assert_eq!(*clipboard.copies.lock().unwrap(), 0);
    }

    #[test]
    fn test_parse_capture() {
        let cli = Cli::try_parse_from([
            "snipmark", "capture", "--mode", "window", "--delay", "3", "--tool", "marker",
            "--color", "#00ff00", "--copy",
        ])
        .unwrap();
        let Commands::Capture(args) = cli.command else {
            panic!("expected capture");
        };
        assert_eq!(args.mode, Some(CaptureMode::Window));
        assert_eq!(args.delay, Some(3));
        assert!(args.output.copy);
        assert_eq!(args.edit.tool, Some(Tool::Marker));
        assert_eq!(args.edit.color, Some(RgbaColor::rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(Cli::try_parse_from(["snipmark", "capture", "--mode", "region"]).is_err());
        assert!(Cli::try_parse_from(["snipmark", "annotate", "a.png", "--color", "red"]).is_err());
        assert!(
            Cli::try_parse_from(["snipmark", "annotate", "a.png", "-o", "b.png", "--dialog"])
                .is_err()
        );
    }

    #[test]
    fn test_flags_override_config() {
        let config = AppConfig {
            tool: Tool::Ellipse,
            ..AppConfig::default()
        };
        let edit = EditArgs {
            width: Some(50),
            ..EditArgs::default()
        };
        let settings = edit.settings(&config);
        assert_eq!(settings.tool, Tool::Ellipse);
        assert_eq!(settings.color, RgbaColor::RED);
        assert_eq!(settings.width.get(), 20);
    }

    #[test]
    fn test_copy_only_skips_saving() {
        let config = AppConfig::default();
        let out = OutputArgs {
            copy: true,
            ..OutputArgs::default()
        };
        assert_eq!(out.target(&config).unwrap(), SaveTarget::None);

        let out = OutputArgs {
            output: Some("x.png".into()),
            ..OutputArgs::default()
        };
        assert_eq!(out.target(&config).unwrap(), SaveTarget::Path("x.png".into()));
    }

    #[test]
    fn test_annotate_with_script_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("in.png");
        image::RgbaImage::from_pixel(32, 32, image::Rgba([255, 255, 255, 255]))
            .save(&image_path)
            .unwrap();
        let script_path = dir.path().join("steps.json");
        std::fs::write(
            &script_path,
            r#"{"steps": [{"press": [4, 16]}, {"move": [28, 16]}, {"release": [28, 16]}]}"#,
        )
        .unwrap();
        let out_path = dir.path().join("out.png");

        let args = AnnotateArgs {
            image: image_path,
            edit: EditArgs {
                script: Some(script_path),
                width: Some(4),
                ..EditArgs::default()
            },
            output: OutputArgs {
                output: Some(out_path.clone()),
                ..OutputArgs::default()
            },
        };
        annotate(&AppConfig::default(), args).unwrap();

        let out = image::open(&out_path).unwrap().to_rgba8();
        assert_eq!(out.get_pixel(16, 16).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(16, 2).0, [255, 255, 255, 255]);
    }
}
