use anyhow::Context;
use clap::{Parser, Subcommand};
use vouch_api::VouchClient;
use vouch_model::{ClaimRequest, LeaseId};

const DEFAULT_ADDR: &str = "http://127.0.0.1:8200";

#[derive(Parser, Debug)]
#[command(name = "vouchctl", about = "Log in to vouchd with a task identity")]
struct Cli {
    /// Base URL of the vouchd HTTP API.
    #[arg(long, env = "VOUCH_ADDR", default_value = DEFAULT_ADDR, global = true)]
    addr: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify this task and print the issued lease.
    Login {
        #[arg(long, env = "MARATHON_APP_ID")]
        app_id: String,
        #[arg(long, env = "MARATHON_APP_VERSION")]
        app_version: String,
        #[arg(long, env = "MESOS_TASK_ID")]
        task_id: String,
    },
    /// Renew a previously issued lease.
    Renew {
        #[arg(long)]
        lease_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = VouchClient::new(cli.addr.as_str());

    match cli.command {
        Command::Login {
            app_id,
            app_version,
            task_id,
        } => {
            let claim = ClaimRequest {
                marathon_app_id: Some(app_id),
                marathon_app_version: Some(app_version),
                mesos_task_id: Some(task_id),
            }
            .into_claim()?;
            let lease = client.login(&claim).await.context("login")?;
            println!("{}", serde_json::to_string_pretty(&lease)?);
        }
        Command::Renew { lease_id } => {
            match client
                .renew(&LeaseId::from(lease_id))
                .await
                .context("renew")?
            {
                Some(lease) => println!("{}", serde_json::to_string_pretty(&lease)?),
                None => println!("renewal declined"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_flags() {
        let cli = Cli::try_parse_from([
            "vouchctl",
            "login",
            "--app-id",
            "/web",
            "--app-version",
            "v1",
            "--task-id",
            "web.1",
        ])
        .unwrap();

        assert_eq!(cli.addr, DEFAULT_ADDR);
        match cli.command {
            Command::Login {
                app_id, task_id, ..
            } => {
                assert_eq!(app_id, "/web");
                assert_eq!(task_id, "web.1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn renew_requires_lease_id() {
        assert!(Cli::try_parse_from(["vouchctl", "renew"]).is_err());

        let cli =
            Cli::try_parse_from(["vouchctl", "--addr", "http://vouch:8200", "renew", "--lease-id", "abc"])
                .unwrap();
        assert_eq!(cli.addr, "http://vouch:8200");
        assert!(matches!(cli.command, Command::Renew { lease_id } if lease_id == "abc"));
    }
}
