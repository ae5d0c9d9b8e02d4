use std::{future::Future, time::Duration};

use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tokio::time::sleep;
use tracing::{instrument, Level};
use url::Url;

use crate::{dates::SemesterRange, static_regex, Error};

pub static HOME_URL: &str = "https://cist.nure.ua/";
static TIMETABLE_BASE_URL: &str = "https://cist.nure.ua/ias/app/tt/f";
static GROUP_REGION_CSS: &str = "div#GROUPS_AJAX table.t13FormRegion";
static GROUP_REGION_HTML_JS: &str =
    "const el = document.getElementById('GROUPS_AJAX'); return el ? el.innerHTML : '';";
static GROUP_REFRESH_POLLS: u32 = 50;
static GROUP_REFRESH_INTERVAL: Duration = Duration::from_millis(200);

/// The page a navigation step ended on.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub source: String,
}

/// A browser session driven over WebDriver. Owned by one pipeline run and
/// closed at its end.
pub struct Session {
    client: Client,
}

fn capabilities(headless: bool) -> serde_json::Map<String, serde_json::Value> {
    let args: Vec<&str> = if headless { vec!["--headless"] } else { vec![] };
    let mut caps = serde_json::Map::new();
    caps.insert("browserName".into(), json!("chrome"));
    caps.insert("pageLoadStrategy".into(), json!("eager"));
    caps.insert("goog:chromeOptions".into(), json!({ "args": args }));
    caps
}

impl Session {
    #[instrument(level = Level::TRACE)]
    pub async fn connect(webdriver_url: &str, headless: bool) -> crate::Result<Self> {
        let client = ClientBuilder::native()
            .capabilities(capabilities(headless))
            .connect(webdriver_url)
            .await?;
        log::info!("connected to webdriver at {webdriver_url}");
        Ok(Self { client })
    }

    async fn current_page(&self) -> crate::Result<Page> {
        let url = self.client.current_url().await?;
        let start = std::time::Instant::now();
        let source = self.client.source().await?;
        log::trace!("Got source of {url} in \t {:?}", start.elapsed());
        Ok(Page { url, source })
    }

    /// Opens the site and switches it to the timetable view, which lists
    /// faculties and groups.
    #[instrument(skip(self), level = Level::TRACE)]
    pub async fn open_timetable_home(&self) -> crate::Result<Page> {
        self.client.goto(HOME_URL).await?;
        self.client
            .execute("doSubmit('T_TIME_TABLE')", vec![])
            .await?;
        self.client
            .wait()
            .for_element(Locator::Css(GROUP_REGION_CSS))
            .await?;
        self.current_page().await
    }

    async fn group_region_html(&self) -> crate::Result<String> {
        let html = self.client.execute(GROUP_REGION_HTML_JS, vec![]).await?;
        Ok(html.as_str().unwrap_or_default().to_owned())
    }

    /// Asks the server to list only the groups of one faculty. The group
    /// region is replaced in place, so this polls until its markup changes.
    #[instrument(skip(self), level = Level::TRACE)]
    pub async fn refresh_groups(&self, faculty_id: &str) -> crate::Result<Page> {
        let before = self.group_region_html().await?;
        self.client
            .execute(&format!("IAS_Change_Groups({faculty_id})"), vec![])
            .await?;
        let changed = wait_for_change(
            &before,
            || self.group_region_html(),
            GROUP_REFRESH_POLLS,
            GROUP_REFRESH_INTERVAL,
        )
        .await?;
        if !changed {
            log::warn!(
                "group region unchanged after selecting faculty {faculty_id}; \
                the catalog may not be filtered"
            );
        }
        self.current_page().await
    }

    #[instrument(skip(self, url), fields(url = %url), level = Level::TRACE)]
    pub async fn timetable_page(&self, url: &Url) -> crate::Result<Page> {
        self.client.goto(url.as_str()).await?;
        self.current_page().await
    }

    pub async fn close(self) -> crate::Result<()> {
        self.client.close().await?;
        log::info!("webdriver session closed");
        Ok(())
    }
}

/// Reads `current` until it differs from `before`, at most `polls` times.
/// Returns whether a change was seen.
async fn wait_for_change<F, Fut>(
    before: &str,
    mut current: F,
    polls: u32,
    interval: Duration,
) -> crate::Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = crate::Result<String>>,
{
    for poll in 0..polls {
        if current().await? != before {
            return Ok(true);
        }
        if poll + 1 < polls {
            sleep(interval).await;
        }
    }
    Ok(false)
}

/// The 16 digit session token the site embeds in its page urls.
pub fn session_token(url: &Url) -> crate::Result<&str> {
    static_regex!(TOKEN <- r"[0-9]{16}");
    TOKEN
        .find(url.as_str())
        .map(|m| m.as_str())
        .ok_or_else(|| Error::SessionTokenMissing(url.to_string()))
}

/// Timetable of one group over `range`. The stream flag is always 0.
pub fn timetable_url(token: &str, range: &SemesterRange, group_id: &str) -> crate::Result<Url> {
    let url = format!(
        "{TIMETABLE_BASE_URL}?p=778:201:{token}:::201:\
        P201_FIRST_DATE,P201_LAST_DATE,P201_GROUP,P201_POTOK:\
        {},{},{group_id},0:",
        range.start, range.end
    );
    Ok(url.parse()?)
}
