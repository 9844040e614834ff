//! Command-line client for the varlink protocol.
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};
use varlink::{
    address::{self, Connected},
    connection::socket::{self, Socket},
    Address, Call, Connection,
};

/// Exit code used when a call reaches the peer but it replies with a varlink error.
const EXIT_VARLINK_ERROR: u8 = 3;
/// Exit code used for connection/IO failures.
const EXIT_IO_ERROR: u8 = 1;
/// Exit code used for protocol/invalid-argument errors.
const EXIT_ARGUMENT_ERROR: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "varlink", version, about = "A command-line varlink client")]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the IDL description of an interface, e.g. `varlink help unix:/run/org.example.ftl/org.example.ftl`.
    Help {
        /// The varlink address to connect to, with a `/org.example.ftl`-style interface suffix.
        address: String,
    },
    /// Query `org.varlink.service.GetInfo` from a service.
    Info {
        /// The varlink address to connect to, e.g. `unix:/run/org.example.ftl`.
        address: String,
    },
    /// Call an arbitrary method on a service.
    Call {
        /// The varlink address to connect to.
        address: String,
        /// The fully-qualified method name, e.g. `org.example.ftl.Ping`.
        method: String,
        /// The method's parameters, as a JSON object. Defaults to `{}`.
        parameters: Option<String>,
        /// Request all replies, not just the first (`more` flag).
        #[arg(long)]
        more: bool,
        /// Don't wait for a reply (`oneway` flag).
        #[arg(long)]
        oneway: bool,
    },
    /// Act as a bridge: proxy this process's stdio to a varlink address.
    ///
    /// This is what `ssh:`/`bridge:` addresses run on the other end: `ssh host varlink bridge`
    /// connects to `address` (or `$VARLINK_ADDRESS` if not given) and shuttles bytes between it
    /// and our own stdin/stdout.
    Bridge {
        /// The varlink address to bridge to. Defaults to `$VARLINK_ADDRESS`.
        address: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .compact()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .without_time()
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to start runtime");

    let code = runtime.block_on(run(cli.command));
    runtime.shutdown_background();
    code
}

async fn run(command: Command) -> ExitCode {
    let result = match command {
        Command::Help { address } => help(&address).await,
        Command::Info { address } => info(&address).await,
        Command::Call {
            address,
            method,
            parameters,
            more,
            oneway,
        } => call(&address, &method, parameters.as_deref(), more, oneway).await,
        Command::Bridge { address } => bridge(address).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Io(e)) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(EXIT_IO_ERROR)
        }
        Err(CliError::InvalidArgument(message)) => {
            eprintln!("{} {message}", "error:".red().bold());
            ExitCode::from(EXIT_ARGUMENT_ERROR)
        }
        Err(CliError::Varlink(value)) => {
            eprintln!("{} {value}", "error:".red().bold());
            ExitCode::from(EXIT_VARLINK_ERROR)
        }
    }
}

#[derive(Debug)]
enum CliError {
    Io(varlink::Error),
    /// A protocol/invalid-argument failure that never reached the peer, e.g. malformed `--`
    /// parameters or an address missing a required `/INTERFACE` suffix.
    InvalidArgument(String),
    Varlink(Value),
}

impl From<varlink::Error> for CliError {
    fn from(e: varlink::Error) -> Self {
        CliError::Io(e)
    }
}

async fn help(address: &str) -> Result<(), CliError> {
    let (_, interface) = Address::parse(address)
        .map_err(|e| CliError::InvalidArgument(format!("invalid address {address:?}: {e}")))?;
    let interface = interface.ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "address {address:?} has no /INTERFACE suffix to look up"
        ))
    })?;

    let mut connected = address::connect(address).await?;
    let reply = dispatch_single(
        &mut connected,
        "org.varlink.service.GetInterfaceDescription",
        serde_json::json!({ "interface": interface }),
    )
    .await?;

    match reply {
        Ok(Some(description)) => {
            if let Some(text) = description.get("description").and_then(Value::as_str) {
                println!("{text}");
            }
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(CliError::Varlink(e)),
    }
}

async fn info(address: &str) -> Result<(), CliError> {
    let mut connected = address::connect(address).await?;
    let reply = dispatch_single(&mut connected, "org.varlink.service.GetInfo", Value::Null).await?;

    match reply {
        Ok(Some(info)) => {
            println!("{}", "Vendor:".bold());
            println!(
                "  {}",
                info.get("vendor").and_then(Value::as_str).unwrap_or("")
            );
            println!("{}", "Product:".bold());
            println!(
                "  {}",
                info.get("product").and_then(Value::as_str).unwrap_or("")
            );
            println!("{}", "Version:".bold());
            println!(
                "  {}",
                info.get("version").and_then(Value::as_str).unwrap_or("")
            );
            println!("{}", "URL:".bold());
            println!("  {}", info.get("url").and_then(Value::as_str).unwrap_or(""));
            println!("{}", "Interfaces:".bold());
            if let Some(interfaces) = info.get("interfaces").and_then(Value::as_array) {
                for interface in interfaces {
                    if let Some(name) = interface.as_str() {
                        println!("  {name}");
                    }
                }
            }
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(CliError::Varlink(e)),
    }
}

async fn call(
    address: &str,
    method: &str,
    parameters: Option<&str>,
    more: bool,
    oneway: bool,
) -> Result<(), CliError> {
    let parameters = match parameters {
        Some(s) => serde_json::from_str(s)
            .map_err(|e| CliError::InvalidArgument(format!("invalid JSON parameters: {e}")))?,
        None => Value::Object(Default::default()),
    };

    let mut connected = address::connect(address).await?;
    let replies = dispatch_all(&mut connected, method, parameters, more, oneway).await?;

    for reply in replies {
        match reply {
            Ok(Some(params)) => println!("{}", serde_json::to_string_pretty(&params).unwrap()),
            Ok(None) => {}
            Err(e) => return Err(CliError::Varlink(e)),
        }
    }

    Ok(())
}

/// Read calls from our own stdin, relay each to `address`, and write its replies to stdout,
/// until the peer on stdin closes the stream.
async fn bridge(address: Option<String>) -> Result<(), CliError> {
    let address = address
        .or_else(varlink::activation::activated_address)
        .ok_or_else(|| {
            CliError::InvalidArgument("no address given and $VARLINK_ADDRESS is not set".into())
        })?;

    let mut connected = address::connect(&address).await?;
    let mut stdio = Connection::new(CliStdio::new());

    loop {
        let call = match stdio.receive_call::<Value>().await {
            Ok(call) => call,
            Err(_) => break,
        };

        match &mut connected {
            Connected::Unix(conn) => bridge_call(conn, &mut stdio, &call).await?,
            Connected::Tcp(conn) => bridge_call(conn, &mut stdio, &call).await?,
            Connected::Exec(exec) => bridge_call(exec.connection(), &mut stdio, &call).await?,
            Connected::Pipe(pipe) => bridge_call(pipe.connection(), &mut stdio, &call).await?,
        }
    }

    Ok(())
}

/// Forward one call received on stdin to `conn`, relaying every reply back to stdin/stdout's
/// connection in turn.
async fn bridge_call<S: Socket>(
    conn: &mut Connection<S>,
    stdio: &mut Connection<CliStdio>,
    call: &Call<Value>,
) -> varlink::Result<()> {
    conn.send_call(call).await?;
    if call.oneway() {
        return Ok(());
    }

    loop {
        match conn.receive_reply::<Value, Value>().await? {
            Ok(reply) => {
                let continues = reply.continues().unwrap_or(false);
                stdio.send_reply(&reply).await?;
                if !continues {
                    break;
                }
            }
            Err(error) => {
                stdio.send_error(&error).await?;
                break;
            }
        }
    }

    Ok(())
}

/// The [`Socket`] implementation over this process's own stdin/stdout, used by `bridge` to speak
/// varlink to whatever spawned us (typically an `ssh:`/`bridge:` transport on the other end).
#[derive(Debug)]
struct CliStdio {
    stdin: tokio::io::Stdin,
    stdout: tokio::io::Stdout,
}

impl CliStdio {
    fn new() -> Self {
        Self {
            stdin: tokio::io::stdin(),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Socket for CliStdio {
    type ReadHalf = CliStdin;
    type WriteHalf = CliStdout;

    fn split(self) -> (Self::ReadHalf, Self::WriteHalf) {
        (CliStdin(self.stdin), CliStdout(self.stdout))
    }
}

#[derive(Debug)]
struct CliStdin(tokio::io::Stdin);

impl socket::ReadHalf for CliStdin {
    async fn read(&mut self, buf: &mut [u8]) -> varlink::Result<usize> {
        self.0.read(buf).await.map_err(Into::into)
    }
}

#[derive(Debug)]
struct CliStdout(tokio::io::Stdout);

impl socket::WriteHalf for CliStdout {
    async fn write(&mut self, buf: &[u8]) -> varlink::Result<()> {
        let mut pos = 0;
        while pos < buf.len() {
            let n = self.0.write(&buf[pos..]).await?;
            pos += n;
        }
        self.0.flush().await.map_err(Into::into)
    }
}

/// Call `method` once and return its single reply, whatever transport `connected` holds.
async fn dispatch_single(
    connected: &mut Connected,
    method: &str,
    parameters: Value,
) -> varlink::Result<Result<Option<Value>, Value>> {
    let call = Call::new(serde_json::json!({
        "method": method,
        "parameters": parameters,
    }));

    match connected {
        Connected::Unix(conn) => call_raw(conn, &call).await,
        Connected::Tcp(conn) => call_raw(conn, &call).await,
        Connected::Exec(exec) => call_raw(exec.connection(), &call).await,
        Connected::Pipe(pipe) => call_raw(pipe.connection(), &call).await,
    }
}

/// Call `method`, collecting every reply if `more` was requested.
async fn dispatch_all(
    connected: &mut Connected,
    method: &str,
    parameters: Value,
    more: bool,
    oneway: bool,
) -> varlink::Result<Vec<Result<Option<Value>, Value>>> {
    let call = Call::new(serde_json::json!({
        "method": method,
        "parameters": parameters,
    }))
    .set_more(more)
    .set_oneway(oneway);

    match connected {
        Connected::Unix(conn) => call_all(conn, &call, oneway).await,
        Connected::Tcp(conn) => call_all(conn, &call, oneway).await,
        Connected::Exec(exec) => call_all(exec.connection(), &call, oneway).await,
        Connected::Pipe(pipe) => call_all(pipe.connection(), &call, oneway).await,
    }
}

async fn call_raw<S: Socket>(
    conn: &mut Connection<S>,
    call: &Call<Value>,
) -> varlink::Result<Result<Option<Value>, Value>> {
    conn.call_method::<Value, Value, Value>(call)
        .await
        .map(|r| r.map(|reply| reply.into_parameters()))
}

async fn call_all<S: Socket>(
    conn: &mut Connection<S>,
    call: &Call<Value>,
    oneway: bool,
) -> varlink::Result<Vec<Result<Option<Value>, Value>>> {
    conn.send_call(call).await?;
    if oneway {
        return Ok(Vec::new());
    }

    let mut replies = Vec::new();
    loop {
        let reply = conn.receive_reply::<Value, Value>().await?;
        let (continues, result) = match reply {
            Ok(r) => (r.continues().unwrap_or(false), Ok(r.into_parameters())),
            Err(e) => (false, Err(e)),
        };
        replies.push(result);
        if !continues {
            break;
        }
    }

    Ok(replies)
}
