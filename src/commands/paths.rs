//! Enumerate the routes the site serves

use anyhow::Result;

use crate::content::static_paths;
use crate::Site;

/// Print `/` and one path per upstream page
pub async fn run(site: &Site) -> Result<()> {
    let pages = site.fetcher()?.fetch_all().await?.into_inner();

    println!("/");
    for path in static_paths(&pages) {
        println!("{}", path);
    }
    Ok(())
}
