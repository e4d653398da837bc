//! grouplink CLI Client
//!
//! Command-line interface for group operations.

use clap::{Parser, Subcommand};
use grouplink::config::DEFAULT_LOG_FILTER;
use grouplink::{
    Config, ExchangeState, GroupClient, GroupMetadata, LinkError, ResultFuture, TcpConnection,
    TtlCache,
};
use tracing_subscriber::{fmt, EnvFilter};

/// grouplink CLI
#[derive(Parser, Debug)]
#[command(name = "grouplink-cli")]
#[command(about = "CLI for group-management requests")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7400")]
    server: String,

    /// Response timeout in milliseconds
    #[arg(short, long, default_value = "20000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show group metadata
    Metadata {
        /// Group jid
        jid: String,
    },

    /// Print a group's invite code
    InviteLink {
        /// Group jid
        jid: String,
    },

    /// Join a group through an invite code
    AcceptInvite {
        /// Invite code
        code: String,
    },

    /// Create a group
    Create {
        /// Group subject
        subject: String,

        /// Initial participants
        participants: Vec<String>,
    },

    /// Rename a group
    Subject {
        /// Group jid
        jid: String,

        /// New subject
        subject: String,
    },

    /// Grant admin rights
    Promote {
        jid: String,
        #[arg(required = true)]
        participants: Vec<String>,
    },

    /// Revoke admin rights
    Demote {
        jid: String,
        #[arg(required = true)]
        participants: Vec<String>,
    },

    /// Add members
    Add {
        jid: String,
        #[arg(required = true)]
        participants: Vec<String>,
    },

    /// Remove members
    Remove {
        jid: String,
        #[arg(required = true)]
        participants: Vec<String>,
    },

    /// Leave a group
    Leave {
        /// Group jid
        jid: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .server_addr(&args.server)
        .msg_timeout_ms(args.timeout_ms)
        .build();

    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(args.command, &config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &Config) -> grouplink::Result<()> {
    let conn = TcpConnection::connect(config)?;
    tracing::info!("Connected to {}", conn.peer_addr());

    let client = GroupClient::new(conn, config);

    match command {
        Commands::Metadata { jid } => {
            let cache: TtlCache<GroupMetadata> = TtlCache::from_config(config);
            let meta = client.get_group_metadata(&jid, Some(&cache))?;
            println!("{} \"{}\" (owner {})", meta.id, meta.subject, meta.owner);
            for p in &meta.participants {
                let role = if p.is_super_admin {
                    "superadmin"
                } else if p.is_admin {
                    "admin"
                } else {
                    "member"
                };
                println!("  {} {}", p.id, role);
            }
        }
        Commands::InviteLink { jid } => {
            print_exchange(&client, client.invite_link_state(&jid))?;
        }
        Commands::AcceptInvite { code } => {
            print_exchange(&client, client.accept_invite_state(&code))?;
        }
        Commands::Create {
            subject,
            participants,
        } => {
            let future = client.create_group(&subject, &participants)?;
            report(&client, future)?;
        }
        Commands::Subject { jid, subject } => {
            report(&client, client.update_group_subject(&subject, &jid)?)?;
        }
        Commands::Promote { jid, participants } => {
            report(&client, client.set_admin(&jid, &participants)?)?;
        }
        Commands::Demote { jid, participants } => {
            report(&client, client.remove_admin(&jid, &participants)?)?;
        }
        Commands::Add { jid, participants } => {
            report(&client, client.add_member(&jid, &participants)?)?;
        }
        Commands::Remove { jid, participants } => {
            report(&client, client.remove_member(&jid, &participants)?)?;
        }
        Commands::Leave { jid } => {
            report(&client, client.leave_group(&jid)?)?;
        }
    }

    Ok(())
}

/// Print a finished one-shot exchange, failing the command unless it resolved
fn print_exchange(
    client: &GroupClient<TcpConnection>,
    state: ExchangeState<String>,
) -> grouplink::Result<()> {
    match state {
        ExchangeState::Resolved(value) => {
            println!("{}", value);
            Ok(())
        }
        ExchangeState::Rejected(status) => Err(LinkError::RequestRejected { status }),
        ExchangeState::TimedOut => Err(LinkError::Timeout(client.resolver().timeout())),
        ExchangeState::Malformed(msg) => Err(LinkError::MalformedResponse(msg)),
        ExchangeState::Failed(msg) => Err(LinkError::Submission(msg)),
        ExchangeState::Pending => Err(LinkError::Protocol("exchange never finished".to_string())),
    }
}

/// Resolve a mutation and print the group id if the service sent one
fn report(client: &GroupClient<TcpConnection>, future: ResultFuture) -> grouplink::Result<()> {
    let gid = client
        .resolver()
        .resolve(future, |envelope| Ok(envelope.string_field("gid").ok()))?;

    match gid {
        Some(gid) => println!("ok {}", gid),
        None => println!("ok"),
    }
    Ok(())
}
