use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();
static SCHEMA_READY: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();

/// Secret shared between the spawned server and locally minted test tokens.
const TEST_SECRET: &str = "jobly-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/jobly-api");
        cmd.env("JOBLY_API_PORT", port.to_string())
            .env("JWT_SECRET", TEST_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // The suite needs a live database, so wait for a clean 200
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    SCHEMA_READY
        .get_or_try_init(apply_schema)
        .await
        .context("failed to apply schema")?;

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Apply schema.sql statement by statement; everything in it is idempotent.
async fn apply_schema() -> Result<()> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set for tests")?;
    let pool = sqlx::PgPool::connect(&url).await?;
    for statement in include_str!("../../schema.sql").split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement).execute(&pool).await?;
        }
    }
    Ok(())
}

/// Unique lowercase identifier so parallel tests and repeated runs never
/// collide on natural keys.
#[allow(dead_code)]
pub fn unique(label: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{label}-{nanos}")
}

#[allow(dead_code)]
pub fn admin_token() -> String {
    mint_token("admin", true)
}

#[allow(dead_code)]
pub fn user_token() -> String {
    mint_token("user", false)
}

/// Mint tokens through the crate's own signing path so the claims layout and
/// algorithm can never drift from what the server validates. The secret must
/// be in the environment before the lazy config first loads.
fn mint_token(username: &str, is_admin: bool) -> String {
    use jobly_api::auth::{generate_token, Claims};

    std::env::set_var("JWT_SECRET", TEST_SECRET);
    let claims = Claims::new(username, is_admin);
    generate_token(&claims).expect("failed to mint test token")
}
