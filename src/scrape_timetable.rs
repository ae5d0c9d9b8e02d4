//! Scrapes the timetable of one group from https://cist.nure.ua and exports it.
//! Every stage consumes the previous one's output, so they run one after another
//! on a single browser session.
use std::path::PathBuf;

use chrono::NaiveDate;
use scraper::Html;

use crate::{
    config::Config,
    dates::SemesterRange,
    export,
    fetch::{self, Page, Session},
    parse::{Catalog, Faculty, Group, Legend, Schedule, TimeTable},
};

/// Loads the group catalog, narrowed to one faculty when configured.
async fn load_catalog(session: &Session, faculty: Option<&str>) -> crate::Result<(Page, Catalog)> {
    let home = session.open_timetable_home().await?;
    let page = match faculty {
        Some(name) => {
            let faculty = {
                let document = Html::parse_document(&home.source);
                let faculties = Faculty::list(document.root_element());
                Faculty::find(&faculties, name)?.clone()
            };
            log::info!("selecting faculty {} ({})", faculty.name(), faculty.id());
            session.refresh_groups(faculty.id()).await?
        }
        None => home,
    };
    let catalog = Catalog::from_html_element(Html::parse_document(&page.source).root_element())?;
    for set in catalog.iter() {
        log::debug!("{}: {} groups", set.course(), set.groups().len());
    }
    log::info!(
        "catalog lists {} groups over {} courses",
        catalog.group_count(),
        catalog.iter().count()
    );
    Ok((page, catalog))
}

/// Extracts the grid and the legend of a timetable page and joins them.
pub fn timetable_from_page(source: &str) -> TimeTable {
    let document = Html::parse_document(source);
    let mut timetable = TimeTable::from_html_element(document.root_element());
    if timetable.is_empty() {
        log::warn!("timetable page has no lesson slots");
    }
    let legend = Legend::from_html_element(document.root_element());
    let enriched = legend.enrich(&mut timetable);
    log::info!(
        "{} slots, {enriched} enriched from {} legend entries",
        timetable.len(),
        legend.len()
    );
    timetable
}

/// Runs the whole pipeline for `config` and returns the exported file.
pub async fn scrape(session: &Session, config: &Config, today: NaiveDate) -> crate::Result<PathBuf> {
    let range = SemesterRange::containing(today);
    log::debug!("term {} - {}", range.start, range.end);

    let (page, catalog) = load_catalog(session, config.faculty.as_deref()).await?;
    let token = fetch::session_token(&page.url)?;
    let group: Group = catalog.resolve(&config.group)?.clone();
    let url = fetch::timetable_url(token, &range, group.id())?;
    log::info!("group {} has id {}", group.name(), group.id());

    let page = session.timetable_page(&url).await?;
    let timetable = timetable_from_page(&page.source);

    let schedule = Schedule::from_timetable(&timetable);
    log::info!(
        "schedule spans {} days and {} periods, {} of them busy",
        schedule.days(),
        schedule.periods().len(),
        schedule.busy()
    );

    export::write(
        &timetable,
        config.output,
        &config.output_dir,
        &config.output_base,
        group.name(),
    )
    .await
}
