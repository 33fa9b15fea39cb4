//! Sign a HEAD request and presign a GET for the same object.
//!
//! ```shell
//! TOS_ACCESS_KEY=... TOS_SECRET_KEY=... TOS_REGION=cn-beijing \
//!     cargo run --example sign_object -- https://bucket.tos-cn-beijing.volces.com/key
//! ```

use std::time::Duration;

use anyhow::Result;
use tossign_core::{Context, OsEnv, Signer};
use tossign_tos::{Config, DefaultCredentialProvider, RequestSigner};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://bucket.tos-cn-beijing.volces.com/hello.txt".to_string());

    let ctx = Context::new().with_env(OsEnv);
    let config = Config::new().from_env(&ctx);
    let signer = Signer::new(
        ctx,
        DefaultCredentialProvider::new(),
        RequestSigner::from_config(&config)?,
    );

    let (mut head, _) = http::Request::head(url.as_str()).body(())?.into_parts();
    signer.sign(&mut head, None).await?;
    for (name, value) in head.headers.iter() {
        println!("{name}: {value:?}");
    }

    let (mut get, _) = http::Request::get(url.as_str()).body(())?.into_parts();
    signer
        .sign(&mut get, Some(Duration::from_secs(3600)))
        .await?;
    println!("presigned: {}", get.uri);

    Ok(())
}
