//! Command-line front end for the ES-to-TS converter.

use clap::error::ErrorKind;
use clap::Parser;
use es2ts::es::VideoType;
use es2ts::{Es2TsError, Pipeline, Result, TsConfig};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::process;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Default port for the TCP sink.
const DEFAULT_TCP_PORT: u16 = 88;

/// Convert an elementary video stream to an H.222 transport stream.
///
/// Supports input streams conforming to MPEG-2 (H.262), MPEG-4/AVC
/// (H.264) and AVS; MPEG-1 input works insofar as MPEG-2 is backwards
/// compatible. The stream is repackaged at startcode boundaries, never
/// parsed as video.
#[derive(Parser, Debug)]
#[command(name = "es2ts", version)]
struct Cli {
    /// Input elementary stream, then output transport stream
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Video PID (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_pid, default_value = "0x68", value_name = "PID")]
    pid: u16,

    /// PMT PID (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_pid, default_value = "0x66", value_name = "PID")]
    pmt: u16,

    /// Treat the input as MPEG-2 (H.262)
    #[arg(long, group = "force")]
    h262: bool,

    /// Treat the input as MPEG-4/AVC (H.264)
    #[arg(long, alias = "avc", group = "force")]
    h264: bool,

    /// Treat the input as AVS
    #[arg(long, group = "force")]
    avs: bool,

    /// Read from standard input (stream type defaults to H.262)
    #[arg(long)]
    stdin: bool,

    /// Write to standard output (forces --quiet)
    #[arg(long)]
    stdout: bool,

    /// Send output over TCP to HOST[:PORT] (port defaults to 88)
    #[arg(long, value_name = "HOST[:PORT]")]
    host: Option<String>,

    /// Stop after this many ES units
    #[arg(short = 'm', long, value_name = "N")]
    max: Option<u64>,

    /// Report each ES unit as it is read
    #[arg(short, long)]
    verbose: bool,

    /// Only output error messages
    #[arg(short, long)]
    quiet: bool,
}

fn parse_pid(s: &str) -> std::result::Result<u16, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|_| format!("'{s}' is not a valid PID"))
}

fn parse_host(spec: &str) -> Result<(String, u16)> {
    match spec.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse().map_err(|_| {
                Es2TsError::InvalidConfig(format!("'{port}' is not a valid port number"))
            })?;
            Ok((host.to_string(), port))
        }
        None => Ok((spec.to_string(), DEFAULT_TCP_PORT)),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut files = cli.files.into_iter();
    let input = if cli.stdin { None } else { files.next() };
    let output = if cli.stdout || cli.host.is_some() {
        None
    } else {
        files.next()
    };
    if let Some(extra) = files.next() {
        return Err(Es2TsError::InvalidConfig(format!(
            "unexpected argument '{}'",
            extra.display()
        )));
    }
    let forced = if cli.h262 {
        Some(VideoType::H262)
    } else if cli.h264 {
        Some(VideoType::H264)
    } else if cli.avs {
        Some(VideoType::Avs)
    } else {
        None
    };
    // Standard input cannot be probed ahead of the copy loop; without an
    // override the classic H.262 default applies.
    let stream_type = forced.or(if cli.stdin {
        Some(VideoType::H262)
    } else {
        None
    });

    let mut config = TsConfig::default()
        .with_video_pid(cli.pid)
        .with_pmt_pid(cli.pmt);
    if let Some(stream_type) = stream_type {
        config = config.with_stream_type(stream_type);
    }
    if let Some(max) = cli.max {
        config = config.with_max_units(max);
    }
    let pipeline = Pipeline::new(config)?;

    let reader: Box<dyn AsyncRead + Unpin + Send> = match (cli.stdin, input) {
        (true, _) => {
            info!("reading from <stdin>");
            Box::new(tokio::io::stdin())
        }
        (false, Some(path)) => {
            info!("reading from {}", path.display());
            Box::new(File::open(&path).await?)
        }
        (false, None) => {
            return Err(Es2TsError::InvalidConfig(
                "no input file specified".to_string(),
            ))
        }
    };

    let writer: Box<dyn AsyncWrite + Unpin + Send> = if let Some(spec) = &cli.host {
        let (host, port) = parse_host(spec)?;
        info!("writing to {host}:{port}");
        Box::new(TcpStream::connect((host.as_str(), port)).await?)
    } else if cli.stdout {
        Box::new(tokio::io::stdout())
    } else if let Some(path) = output {
        info!("writing to {}", path.display());
        Box::new(File::create(&path).await?)
    } else {
        return Err(Es2TsError::InvalidConfig(
            "no output file specified".to_string(),
        ));
    };

    pipeline.run(reader, writer).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // clap's own exit path would report usage errors with code 2; the
    // converter's contract is 1 for every usage or runtime error.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                let _ = err.print();
                process::exit(0);
            }
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let quiet = cli.quiet || cli.stdout;
    let level = if quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("es2ts: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pid_decimal_and_hex() {
        assert_eq!(parse_pid("104").unwrap(), 104);
        assert_eq!(parse_pid("0x68").unwrap(), 0x68);
        assert_eq!(parse_pid("0X1FFE").unwrap(), 0x1FFE);
        assert!(parse_pid("video").is_err());
        assert!(parse_pid("0x").is_err());
    }

    #[test]
    fn test_parse_host_with_and_without_port() {
        assert_eq!(
            parse_host("example.com").unwrap(),
            ("example.com".to_string(), DEFAULT_TCP_PORT)
        );
        assert_eq!(
            parse_host("example.com:8888").unwrap(),
            ("example.com".to_string(), 8888)
        );
        assert!(parse_host("example.com:tv").is_err());
    }

    #[test]
    fn test_force_flags_conflict() {
        use clap::CommandFactory;
        let result = Cli::command().try_get_matches_from(["es2ts", "--h262", "--h264", "a", "b"]);
        assert!(result.is_err());
    }
}
