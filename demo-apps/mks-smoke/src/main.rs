use anyhow::{anyhow, bail, Result};
use futures::future::join_all;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mks_smoke=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_url = std::env::var("MKS_SMOKE_URL")
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

    // Redirects are asserted on, never followed
    let client = Client::builder().redirect(Policy::none()).build()?;

    tracing::info!("🧪 mks smoke tests");
    tracing::info!("   Server: {}", server_url);
    println!();

    test_create_and_resolve(&client, &server_url).await?;
    test_parallel_create(&client, &server_url).await?;
    test_unknown_slug(&client, &server_url).await?;
    test_rejected_requests(&client, &server_url).await?;

    println!();
    tracing::info!("✅ All tests passed!");

    Ok(())
}

/// Posts the form and returns the slug of the created short link
async fn create(client: &Client, server_url: &str, link: &str, expires_in: &str) -> Result<String> {
    let response = client
        .post(format!("{}/", server_url))
        .form(&[("link", link), ("expiresIn", expires_in)])
        .send()
        .await?;

    if response.status() != StatusCode::CREATED {
        bail!("expected 201 creating {}, got {}", link, response.status());
    }

    let html = response.text().await?;
    extract_slug(&html)
}

/// The short URL sits in `<a id="short-url" href="...">`; the slug is its
/// last path segment
fn extract_slug(html: &str) -> Result<String> {
    let marker = "id=\"short-url\" href=\"";
    let start = html
        .find(marker)
        .ok_or_else(|| anyhow!("response page has no short url"))?
        + marker.len();
    let end = html[start..]
        .find('"')
        .ok_or_else(|| anyhow!("unterminated short url"))?
        + start;

    html[start..end]
        .rsplit('/')
        .next()
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("short url has no slug"))
}

/// Resolves `slug` and returns the `Location` it redirects to
async fn resolve(client: &Client, server_url: &str, slug: &str) -> Result<Option<String>> {
    let response = client.get(format!("{}/{}", server_url, slug)).send().await?;

    match response.status() {
        StatusCode::FOUND => {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .ok_or_else(|| anyhow!("302 without Location for {}", slug))?
                .to_str()?
                .to_string();
            Ok(Some(location))
        }
        StatusCode::NOT_FOUND => Ok(None),
        other => bail!("unexpected status {} resolving {}", other, slug),
    }
}

/// Test creating a short link and following it
async fn test_create_and_resolve(client: &Client, server_url: &str) -> Result<()> {
    tracing::info!("Test: Create and resolve");

    let link = "https://example.com/smoke?q=1&r=2";
    let slug = create(client, server_url, link, "15min").await?;
    tracing::info!("   Created {}/{}", server_url, slug);

    let location = resolve(client, server_url, &slug).await?;
    assert_eq!(location.as_deref(), Some(link), "Redirect should point at the original link");

    tracing::info!("   ✓ Redirect target matches");
    Ok(())
}

/// Test parallel creation - every slug distinct, every redirect correct
async fn test_parallel_create(client: &Client, server_url: &str) -> Result<()> {
    let num_operations = 200;
    tracing::info!("Test: Parallel create ({} concurrent requests)", num_operations);

    let semaphore = Arc::new(Semaphore::new(50)); // Limit concurrent connections
    let start = Instant::now();

    let create_futures: Vec<_> = (0..num_operations)
        .map(|i| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await?;
                let link = format!("https://example.com/parallel/{}", i);
                let slug = create(client, server_url, &link, "1h").await?;
                Ok::<_, anyhow::Error>((slug, link))
            }
        })
        .collect();

    let created = join_all(create_futures)
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    let elapsed = start.elapsed();
    tracing::info!(
        "   Created {} links in {:?} ({:.0} req/sec)",
        num_operations,
        elapsed,
        num_operations as f64 / elapsed.as_secs_f64()
    );

    let unique: HashSet<&str> = created.iter().map(|(slug, _)| slug.as_str()).collect();
    assert_eq!(unique.len(), num_operations, "Every slug should be distinct");

    let resolve_futures: Vec<_> = created
        .iter()
        .map(|(slug, link)| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await?;
                let location = resolve(client, server_url, slug).await?;
                let matches = location.as_deref() == Some(link.as_str());
                if !matches {
                    tracing::error!("Slug {} resolved to {:?}, expected {}", slug, location, link);
                }
                Ok::<_, anyhow::Error>(matches)
            }
        })
        .collect();

    let errors = join_all(resolve_futures)
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .filter(|ok| !ok)
        .count();

    assert_eq!(errors, 0, "No redirect should be mixed up");
    tracing::info!("   ✓ All {} redirects verified", num_operations);
    Ok(())
}

/// Test that a slug that was never issued is not found
async fn test_unknown_slug(client: &Client, server_url: &str) -> Result<()> {
    tracing::info!("Test: Unknown slug");

    // Uppercase never appears in issued slugs
    let location = resolve(client, server_url, "NOT-A-SLUG").await?;
    assert!(location.is_none(), "Unknown slug should not redirect");

    tracing::info!("   ✓ Unknown slug returns 404");
    Ok(())
}

/// Test the handler's input checks
async fn test_rejected_requests(client: &Client, server_url: &str) -> Result<()> {
    tracing::info!("Test: Rejected requests");

    let response = client
        .post(format!("{}/", server_url))
        .form(&[("expiresIn", "1h")])
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "Missing link should be rejected");

    let response = client
        .post(format!("{}/", server_url))
        .form(&[("link", ""), ("expiresIn", "1h")])
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "Empty link should be rejected");

    let response = client.delete(format!("{}/", server_url)).send().await?;
    assert_eq!(
        response.status(),
        StatusCode::METHOD_NOT_ALLOWED,
        "DELETE should not be allowed"
    );

    tracing::info!("   ✓ Bad input rejected with the right status");
    Ok(())
}
