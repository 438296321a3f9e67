//! Token login against httpbin.org
//!
//! ```text
//! cargo run --example login -- login --help
//! cargo run --example login -- login --token abc
//! cargo run --example login -- bearer
//! ```
//!
//! `login` stores the access token in `.context.json`; every later request
//! carries it as a bearer token. `--base-url` overrides the bound API root.

use anyhow::anyhow;
use curlkit::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// State kept between invocations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Context {
    access_token: Option<String>,
}

fn headers(context: &Context, _args: &ResolvedArgs) -> Headers {
    let mut headers = Headers::new();
    if let Some(token) = &context.access_token {
        headers.insert("Authorization".to_string(), format!("Bearer {token}"));
    }
    headers
}

fn build() -> CurlerResult<Curler<Context>> {
    Curler::new(Context::default())
        .name("login")
        .about("Log in to httpbin.org and call an authenticated endpoint")
        .bind("base_url", "https://httpbin.org")
        .headers(HookSpec::new(), headers)?
        .action(
            ActionSpec::new("login")
                .about("Exchange a token for an access token")
                .param(ParamSpec::required("base_url"))
                .param(ParamSpec::optional("token", "123").help("Token sent to the login endpoint")),
            |call| {
                Box::pin(async move {
                    let base_url: String = call.args.get("base_url")?;
                    let token: String = call.args.get("token")?;
                    let response = call
                        .client
                        .post(&format!("{base_url}/post"), &json!({ "access_token": token }))
                        .await?
                        .error_for_status()?;
                    let access_token = response.body["json"]["access_token"]
                        .as_str()
                        .ok_or_else(|| anyhow!("login response carried no access token"))?
                        .to_string();
                    call.context.access_token = Some(access_token);
                    Ok(ActionOutput::json(response.body))
                })
            },
        )?
        .action(
            ActionSpec::new("bearer")
                .about("Call an endpoint that requires the bearer token")
                .param(ParamSpec::required("base_url")),
            |call| {
                Box::pin(async move {
                    let base_url: String = call.args.get("base_url")?;
                    let url = format!("{base_url}/bearer");
                    tracing::info!(%url, "calling bearer endpoint");
                    let response = call.client.get(&url).await?.error_for_status()?;
                    Ok(ActionOutput::json(response.body))
                })
            },
        )
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging(None);

    let cli = match build() {
        Ok(cli) => cli,
        Err(err) => exit_with::<Context>(Err(err), "login"),
    };
    exit_with(cli.run().await, "login")
}
