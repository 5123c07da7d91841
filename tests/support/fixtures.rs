use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const APPS_HEADER: &str = "App,Category,Rating,Reviews,Size,Installs,Type,Price,Content Rating,Genres,Last Updated,Current Ver,Android Ver";
const REVIEWS_HEADER: &str =
    "App,Translated_Review,Sentiment,Sentiment_Polarity,Sentiment_Subjectivity";
const BRACKETS: [u64; 6] = [10, 100, 1_000, 10_000, 100_000, 1_000_000];
const CATEGORIES: [&str; 3] = ["GAME", "TOOLS", "FAMILY"];

/// Number of apps in the synthetic export that end up as observations.
pub const USABLE_APPS: usize = 60;

pub struct StoreExport {
    pub apps_csv: PathBuf,
    pub reviews_csv: PathBuf,
}

fn with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Write a small app/review export.
///
/// Besides the usable apps it contains a column-shifted row, a duplicate app,
/// an unrated app and an app without reviews; none become observations.
pub fn write_store_export(dir: &Path) -> StoreExport {
    let mut apps = String::from(APPS_HEADER);
    apps.push('\n');
    let mut reviews = String::from(REVIEWS_HEADER);
    reviews.push('\n');

    for i in 0..USABLE_APPS {
        let installs = BRACKETS[i % BRACKETS.len()];
        let rating = 3.0 + (i % 20) as f64 * 0.1;
        let category = CATEGORIES[i % CATEGORIES.len()];
        writeln!(
            apps,
            "App {i},{category},{rating:.1},{},{}M,\"{}+\",Free,0,Everyone,Tools,\"January 7, 2018\",1.0,4.0 and up",
            i * 7 + 1,
            5 + i % 30,
            with_commas(installs)
        )
        .unwrap();
        let polarity = ((i % 11) as f64 - 5.0) / 10.0;
        let subjectivity = (i % 7) as f64 / 10.0;
        writeln!(reviews, "App {i},Nice,Positive,{polarity},{subjectivity}").unwrap();
        writeln!(reviews, "App {i},Meh,Neutral,0.0,{}", subjectivity / 2.0).unwrap();
        writeln!(reviews, "App {i},nan,nan,nan,nan").unwrap();
    }

    apps.push_str(
        "Shifted,1.9,19,3.0M,\"1,000+\",Free,0,Everyone,,\"February 11, 2018\",1.0.19,4.0 and up\n",
    );
    apps.push_str(
        "App 0,GAME,4.9,1,1M,\"500+\",Free,0,Everyone,Tools,\"January 7, 2018\",1.0,4.0 and up\n",
    );
    apps.push_str(
        "Unrated,GAME,NaN,0,1M,\"50+\",Free,0,Everyone,Tools,\"January 7, 2018\",1.0,4.0 and up\n",
    );
    apps.push_str(
        "Silent,TOOLS,4.0,3,2M,\"5+\",Paid,$0.99,Everyone,Tools,\"January 7, 2018\",1.0,4.0 and up\n",
    );
    reviews.push_str("Unrated,Fine,Positive,0.3,0.4\n");

    let apps_csv = dir.join("googleplaystore.csv");
    let reviews_csv = dir.join("googleplaystore_user_reviews.csv");
    std::fs::write(&apps_csv, apps).unwrap();
    std::fs::write(&reviews_csv, reviews).unwrap();
    StoreExport {
        apps_csv,
        reviews_csv,
    }
}
