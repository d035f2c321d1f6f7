use anyhow::Context;
use hydrogen_density::cli::{self, CliArgs};
use hydrogen_density::colormap::{list_colormaps, Colormap};
use hydrogen_density::prompt::Prompter;
use hydrogen_density::render::render_to_dir;
use hydrogen_density::style::{load_overrides, Style, Theme};
use log::debug;
use std::io;
use std::path::Path;
use std::process::ExitCode;

fn apply_style_file(style: Style, args: &CliArgs) -> anyhow::Result<Style> {
    match &args.style_path {
        Some(path) => {
            let overrides = load_overrides(path)
                .with_context(|| format!("reading style file {}", path.display()))?;
            Ok(style.with_overrides(&overrides)?)
        }
        None => Ok(style),
    }
}

fn dump_style(args: &CliArgs) -> anyhow::Result<()> {
    let colormap = Colormap::from_name(&args.colormap)?;
    let style = Style::for_theme(Theme::from_flag(args.dark_theme), &colormap);
    let style = apply_style_file(style, args)?;
    println!("{}", style.to_json()?);
    Ok(())
}

fn run(args: &CliArgs) -> anyhow::Result<()> {
    let request = match args.request()? {
        Some(request) => request,
        None => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            prompter.request().context("interactive input")?
        }
    };
    debug!("request: {request:?}");

    let validated = request.validate()?;
    let style = apply_style_file(validated.default_style(), args)?;
    let path = render_to_dir(&validated, &style, Path::new("."))?;
    println!("Saved {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}\n\n{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    if args.help {
        println!("{}", cli::USAGE);
        return ExitCode::SUCCESS;
    }
    if args.list_colormaps {
        for name in list_colormaps() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }
    if let Err(e) = args.request() {
        eprintln!("error: {e}\n\n{}", cli::USAGE);
        return ExitCode::from(2);
    }

    let result = if args.dump_style {
        dump_style(&args)
    } else {
        run(&args)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
