//! Scripted walkthrough of the visit repositories.
//!
//! Starts from a clean slate for the demo keys, then exercises counting,
//! recording, deletion and both pagination paths, checking the
//! `has_more_pages` flags along the way.

use anyhow::{ensure, Context, Result};
use futures_util::future::try_join_all;

use visitlog_core::visits::{
    demo_visit_keys, sample_visitors, Visit, VisitRepository, VisitorRepository,
};

/// Joins visits with `, ` the way the narrative prints them.
fn list(visits: &[Visit]) -> String {
    visits
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn verify(condition: bool, what: &str) -> Result<()> {
    ensure!(condition, "Verification failed: {}", what);
    Ok(())
}

/// Runs the walkthrough, printing each step.
pub async fn run(visits: &VisitRepository, visitors: &VisitorRepository) -> Result<()> {
    tracing::info!("Starting demo");

    for profile in sample_visitors() {
        visitors.put(&profile).await?;
    }

    // Delete old items
    try_join_all(
        demo_visit_keys()
            .iter()
            .map(|key| visits.delete(&key.visitor, &key.location)),
    )
    .await?;

    // Get an item
    let count = visits.get_count("matt", "guatemala").await?;
    println!("(Just getting) Matt has visited Guatemala {} time(s)", count);

    // Record one new visit (utah) and one that may already exist (guatemala)
    visits.record("matt", "utah").await?;
    visits.record("matt", "guatemala").await?;

    let guatemala = visits.get_count("matt", "guatemala").await?;
    println!(
        "(After recording) Matt has visited Guatemala {} time(s)",
        guatemala
    );
    let utah = visits.get_count("matt", "utah").await?;
    println!("(After recording) Matt has visited utah {} time(s)", utah);

    // Delete an item
    visits.delete("matt", "utah").await?;
    let utah = visits.get_count("matt", "utah").await?;
    println!("(After deletion) Matt has visited utah {} time(s)", utah);
    verify(utah == 0, "utah count after deletion")?;

    // Add more items
    try_join_all(
        [
            ("matt", "idaho"),
            ("matt", "italy"),
            ("elliot", "italy"),
            ("nate", "italy"),
            ("adam", "italy"),
        ]
        .into_iter()
        .map(|(visitor, location)| visits.record(visitor, location)),
    )
    .await?;

    // Locations: first page, then the page after its last location
    let page = visits.get_locations_visited("matt", None, None).await?;
    println!(
        "Matt has visited: {}, and are there more pages? {}",
        list(&page.values),
        page.has_more_pages
    );
    verify(page.has_more_pages, "matt's first page reports more pages")?;

    let last_location = page
        .last()
        .map(|visit| visit.location.clone())
        .context("matt's first page is empty")?;
    let page2 = visits
        .get_locations_visited("matt", Some(&last_location), None)
        .await?;
    println!(
        "Matt has also visited: {}, and are there more pages? {}",
        list(&page2.values),
        page2.has_more_pages
    );
    verify(!page2.has_more_pages, "matt's second page is the last")?;

    // Visitors through the location index
    let page3 = visits.get_visitors("italy", None, None).await?;
    println!(
        "Italy was visited by: {}, and are there are more pages? {}",
        list(&page3.values),
        page3.has_more_pages
    );
    verify(page3.has_more_pages, "italy's first page reports more pages")?;

    let last_visitor = page3
        .last()
        .map(|visit| visit.visitor.clone())
        .context("italy's first page is empty")?;
    let page4 = visits
        .get_visitors("italy", Some(&last_visitor), None)
        .await?;
    println!(
        "Italy was also visited by: {}, and are there are more pages? {}",
        list(&page4.values),
        page4.has_more_pages
    );
    verify(!page4.has_more_pages, "italy's second page is the last")?;

    // Profiles of everyone who went to italy
    let names: Vec<&str> = page3
        .values
        .iter()
        .chain(&page4.values)
        .map(|visit| visit.visitor.as_str())
        .collect();
    let profiles = visitors.batch_get(&names).await?;
    for profile in &profiles {
        println!("{}", profile);
    }

    tracing::info!(profiles = profiles.len(), "Demo finished");
    Ok(())
}
