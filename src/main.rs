//! `shellkit` exposes the shell's window helper and icon item on the command line, which is handy
//! for binding window operations to hot keys and for checking how an icon source resolves.
//!
//! ## Command line examples
//!
//! ### Start an interactive move
//! Hand window `0x2600007` over to the window manager to be dragged with the pointer.
//! ```bash
//! shellkit window move 0x2600007
//! ```
//!
//! ### Start an interactive resize
//! Resize the window from its bottom right corner.
//! ```bash
//! shellkit window resize 0x2600007 bottom-right
//! ```
//!
//! ### Render an icon
//! Resolve a theme icon at 48x48 on a 2x screen and save the result.
//! ```bash
//! shellkit icon system-file-manager --size 48x48 --dpr 2 --out fm.png
//! ```
use std::{path::PathBuf, process};

use clap::{crate_description, crate_version, Arg, ArgAction, ArgMatches, Command};
use gory::*;
use libshellkit::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use witcher::prelude::*;

fn cli() -> Command {
    let win = Arg::new("WIN").required(true).help("Window id, decimal or 0x prefixed hex");
    let at = Arg::new("at").long("at").value_name("X,Y").help("Logical pointer position instead of the current one");
    Command::new("shellkit")
        .about(crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .version(crate_version!())
        .arg(Arg::new("verbose").short('v').long("verbose").action(ArgAction::Count).global(true).help("Increase logging"))
        .arg(Arg::new("display").long("display").global(true).help("X display to connect to"))
        .arg(Arg::new("dpr").long("dpr").global(true).default_value("1").help("Device pixel ratio"))
        .subcommand(
            Command::new("window")
                .visible_alias("w")
                .about("Ask the window manager to manipulate a window")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("move")
                        .visible_alias("m")
                        .about("Start an interactive move")
                        .arg(win.clone())
                        .arg(at.clone()),
                )
                .subcommand(
                    Command::new("resize")
                        .visible_alias("r")
                        .about("Start an interactive resize")
                        .arg(win.clone())
                        .arg(Arg::new("EDGES").required(true).help("Edges to drag e.g. top, bottom-right"))
                        .arg(at),
                )
                .subcommand(Command::new("cancel").about("Cancel an interactive move or resize").arg(win.clone()))
                .subcommand(Command::new("minimize").visible_alias("min").about("Minimize a window").arg(win)),
        )
        .subcommand(Command::new("info").visible_alias("i").about("Show window manager details"))
        .subcommand(
            Command::new("icon")
                .about("Render an icon source to a png file")
                .arg(Arg::new("SOURCE").required(true).help("File, file: URL, qrc:/ resource or theme icon name"))
                .arg(Arg::new("size").long("size").value_name("WxH").default_value("48x48"))
                .arg(Arg::new("theme").long("theme").help("Icon theme, defaults to the system theme"))
                .arg(Arg::new("icons").long("icons").value_name("DIR").help("Look theme names up in this directory"))
                .arg(Arg::new("resources").long("resources").value_name("DIR").help("Root for qrc:/ resources"))
                .arg(Arg::new("out").long("out").short('o').required(true).value_name("FILE")),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("{} {:?}", "error:".red(), err);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let dpr = parse_dpr(matches.get_one::<String>("dpr").map(String::as_str).unwrap_or("1")).pass()?;
    match matches.subcommand() {
        Some(("window", sub)) => {
            let config = HelperConfig { display: matches.get_one::<String>("display").cloned(), device_pixel_ratio: dpr };
            let helper = WindowHelper::connect_with(config).wrap("Failed to connect to the X server")?;
            window(&helper, sub)
        },
        Some(("info", _)) => {
            let config = HelperConfig { display: matches.get_one::<String>("display").cloned(), device_pixel_ratio: dpr };
            let mut helper = WindowHelper::connect_with(config).wrap("Failed to connect to the X server")?;
            info(&mut helper)
        },
        Some(("icon", sub)) => icon(sub, dpr),
        _ => unreachable!(),
    }
}

fn window(helper: &WindowHelper, matches: &ArgMatches) -> Result<()> {
    let (name, sub) = match matches.subcommand() {
        Some((name, sub)) => (name, sub),
        None => unreachable!(),
    };
    let win = parse_win(arg(sub, "WIN")).pass()?;
    let at = match sub.try_get_one::<String>("at").ok().flatten() {
        Some(val) => Some(parse_point(val).pass()?),
        None => None,
    };
    debug!("window {}: id: {}, at: {:?}", name, win, at);

    match name {
        "move" => match at {
            Some(pos) => helper.start_system_move_resize_at(win, pos, MoveResizeAction::Move),
            None => helper.start_system_move(win),
        },
        "resize" => {
            let edges = Edges::try_from(arg(sub, "EDGES")).pass()?;
            match at {
                Some(pos) => helper.start_system_move_resize_at(win, pos, MoveResizeAction::Resize(edges)),
                None => helper.start_system_resize(win, edges),
            }
        },
        "cancel" => helper.cancel_system_move_resize(win),
        "minimize" => helper.minimize_window(win),
        _ => unreachable!(),
    }
    .wrap("Failed to send the window manager request")
}

fn info(helper: &mut WindowHelper) -> Result<()> {
    let wm_name = match helper.winmgr() {
        Ok((_, name)) => name,
        Err(_) => "unknown".to_owned(),
    };
    helper.refresh_compositing().wrap("Failed to query the compositing manager")?;
    let yes_no = |val: bool| if val { "yes".green().to_string() } else { "no".red().to_string() };

    println!("X11 Information");
    println!("-----------------------------------------------------------------------");
    println!("Window Manager:    {}", wm_name);
    println!("Compositing:       {}", yes_no(helper.compositing()));
    println!("Root Window:       {}", helper.root());
    println!("Screen:            {}", helper.screen());
    println!("MoveResize:        {}", yes_no(helper.supported(helper.atoms._NET_WM_MOVERESIZE)));
    println!("State Hidden:      {}", yes_no(helper.supported(helper.atoms._NET_WM_STATE_HIDDEN)));
    Ok(())
}

fn icon(matches: &ArgMatches, dpr: f64) -> Result<()> {
    let source = arg(matches, "SOURCE");
    let (w, h) = parse_size(arg(matches, "size")).pass()?;
    let out = PathBuf::from(arg(matches, "out"));

    let config = IconConfig {
        theme: matches.get_one::<String>("theme").cloned(),
        resource_root: matches.get_one::<String>("resources").map(PathBuf::from),
        device_pixel_ratio: dpr,
        ..Default::default()
    };
    let mut item = match matches.get_one::<String>("icons") {
        Some(dir) => IconItem::with_theme(config, Box::new(DirTheme::new([dir]))),
        None => IconItem::new(config),
    };
    item.set_geometry(w as f64, h as f64);
    item.set_source(source);
    item.complete();

    let pixmap = item.pixmap().ok_or(ShellKitError::IconNotFound(source.to_owned())).pass()?;
    pixmap.image.save(&out).wrap("Failed to write the rendered icon")?;
    println!("{} {}x{} -> {}", source, pixmap.image.width(), pixmap.image.height(), out.display());
    Ok(())
}

// Required arguments are enforced by clap
fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.get_one::<String>(name).map(String::as_str).unwrap_or_default()
}

fn parse_win(val: &str) -> std::result::Result<u32, ShellKitError> {
    let parsed = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => val.parse::<u32>(),
    };
    parsed.map_err(|_| ShellKitError::InvalidWindow(val.to_owned()))
}

fn parse_point(val: &str) -> std::result::Result<Point, ShellKitError> {
    let invalid = || ShellKitError::InvalidWindow(format!("bad position {}", val));
    let (x, y) = val.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<i32>().map_err(|_| invalid())?;
    let y = y.trim().parse::<i32>().map_err(|_| invalid())?;
    Ok(Point::new(x, y))
}

fn parse_size(val: &str) -> std::result::Result<(u32, u32), ShellKitError> {
    let invalid = || ShellKitError::InvalidIconSource(format!("bad size {}", val));
    let (w, h) = val.split_once(|c| c == 'x' || c == 'X').ok_or_else(invalid)?;
    Ok((w.parse().map_err(|_| invalid())?, h.parse().map_err(|_| invalid())?))
}

fn parse_dpr(val: &str) -> std::result::Result<f64, ShellKitError> {
    match val.parse::<f64>() {
        Ok(dpr) if dpr > 0.0 => Ok(dpr),
        _ => Err(ShellKitError::InvalidIconSource(format!("bad device pixel ratio {}", val))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_parse_win() {
        assert_eq!(parse_win("0x2600007"), Ok(0x2600007));
        assert_eq!(parse_win("39845895"), Ok(39845895));
        assert!(parse_win("window").is_err());
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_point("10, -4"), Ok(Point::new(10, -4)));
        assert!(parse_point("10").is_err());
        assert_eq!(parse_size("48x32"), Ok((48, 32)));
        assert!(parse_size("48").is_err());
        assert_eq!(parse_dpr("1.5"), Ok(1.5));
        assert!(parse_dpr("0").is_err());
    }
}
