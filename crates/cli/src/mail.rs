use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchAttempt {
    pub command: &'static str,
    pub args: Vec<String>,
}

/// Commands that hand a URL to the host's default handler, in the order they
/// are tried.
pub fn launch_plan(url: &str) -> Vec<LaunchAttempt> {
    if cfg!(target_os = "macos") {
        vec![LaunchAttempt {
            command: "open",
            args: vec![url.to_string()],
        }]
    } else if cfg!(target_os = "windows") {
        // `start` goes through cmd.exe and would split the URL on `&`.
        vec![LaunchAttempt {
            command: "rundll32",
            args: vec!["url.dll,FileProtocolHandler".to_string(), url.to_string()],
        }]
    } else {
        vec![
            LaunchAttempt {
                command: "xdg-open",
                args: vec![url.to_string()],
            },
            LaunchAttempt {
                command: "gio",
                args: vec!["open".to_string(), url.to_string()],
            },
        ]
    }
}

/// Opens the default mail client with a `mailto:` link. Detached; the
/// spawned handler is not waited on.
pub fn open_mail_client(mailto_url: &str) -> anyhow::Result<()> {
    let mut errors = Vec::new();
    for attempt in launch_plan(mailto_url) {
        match Command::new(attempt.command)
            .args(&attempt.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => {
                tracing::info!(command = attempt.command, "opened mail client");
                return Ok(());
            }
            Err(e) => errors.push(format!("{} ({e})", attempt.command)),
        }
    }

    anyhow::bail!("no handler could open the mailto link: {}", errors.join(" | "))
}
