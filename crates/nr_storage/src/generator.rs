//! Seeded generation of the demo corpus.

use chrono::{DateTime, Duration, Utc};
use nr_core::{Article, Category, Result, Source};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::corpus::Corpus;

pub const DEFAULT_ARTICLE_COUNT: usize = 50;
pub const DEFAULT_SEED: u64 = 0x6e65_7773;

/// Publication times are spread over this many days before the reference time.
const MAX_AGE_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub count: usize,
    pub seed: u64,
    pub reference_time: DateTime<Utc>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_ARTICLE_COUNT,
            seed: DEFAULT_SEED,
            reference_time: Utc::now(),
        }
    }
}

const TITLES: &[&str] = &[
    "New AI Breakthrough Could Revolutionize Healthcare",
    "Tech Giants Announce Partnership on Quantum Computing Initiative",
    "Scientists Discover Potential Treatment for Rare Disease",
    "Global Markets React to Economic Policy Changes",
    "Innovative Startup Secures $50M in Funding for Climate Solution",
    "Research Shows Benefits of Mediterranean Diet for Heart Health",
    "New Study Reveals Impact of Social Media on Mental Health",
    "Advances in Renewable Energy Storage Show Promise",
    "Sports Team Breaks Record With Historic Championship Win",
    "Entertainment Industry Adapts to Changing Viewer Preferences",
    "Tech Companies Implement New Privacy Features",
    "Medical Researchers Make Breakthrough in Cancer Treatment",
    "New Space Mission Aims to Explore Distant Planets",
    "Economic Experts Predict Growth Despite Challenges",
    "Innovative App Helps Users Track Environmental Impact",
];

const DESCRIPTIONS: &[&str] = &[
    "Researchers have developed a new AI model that can predict disease outcomes with 95% accuracy.",
    "Leading tech companies join forces to advance quantum computing research and applications.",
    "A clinical trial shows promising results for a treatment targeting a previously untreatable condition.",
    "Stock markets worldwide respond to major policy announcements from central banks.",
    "Climate tech startup receives significant investment to scale carbon capture technology.",
    "Long-term study confirms benefits of Mediterranean eating patterns for cardiovascular health.",
    "Research indicates correlation between social media usage patterns and mental wellbeing indicators.",
    "New battery technology could make renewable energy storage more efficient and affordable.",
    "Team overcomes obstacles to win championship after record-breaking season performance.",
    "Streaming platforms and content creators adapt to changing consumer viewing habits.",
    "New features aim to give users more control over their personal data and privacy settings.",
    "Clinical trials show promising results for targeted therapy approach to treating specific cancers.",
    "Space agency announces plans for mission to explore potentially habitable exoplanets.",
    "Despite global challenges, economists project moderate growth in key sectors over coming year.",
    "New mobile application helps consumers track and reduce their environmental footprint.",
];

const IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b?q=80&w=1470&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1531297484001-80022131f5a1?q=80&w=1420&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1576086213369-97a306d36557?q=80&w=1480&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1551288049-bebda4e38f71?q=80&w=1470&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d?q=80&w=1472&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1526374965328-7f61d4dc18c5?q=80&w=1470&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1432821596592-e2c18b78144f?q=80&w=1470&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1581089778245-3ce67677f718?q=80&w=1470&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1451187580459-43490279c0fa?q=80&w=1472&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1504639725590-34d0984388bd?q=80&w=1374&auto=format&fit=crop",
];

const BODY_PARAGRAPHS: &[&str] = &[
    "The full report goes well beyond the headline, with background on how the story developed and who is affected.",
    "People close to the matter shared their views on what comes next, and analysts weighed in on the longer-term picture.",
];

pub fn default_sources() -> Vec<Source> {
    [
        (
            "techcrunch",
            "TechCrunch",
            "https://techcrunch.com",
            "https://techcrunch.com/wp-content/uploads/2015/02/cropped-cropped-favicon-gradient.png",
        ),
        ("bbc-news", "BBC News", "https://www.bbc.com/news", "https://www.bbc.co.uk/favicon.ico"),
        ("cnn", "CNN", "https://www.cnn.com", "https://www.cnn.com/favicon.ico"),
        (
            "the-verge",
            "The Verge",
            "https://www.theverge.com",
            "https://www.theverge.com/favicon.ico",
        ),
        ("wired", "Wired", "https://www.wired.com", "https://www.wired.com/favicon.ico"),
    ]
    .into_iter()
    .map(|(id, name, url, icon)| Source {
        id: id.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        icon: Some(icon.to_string()),
    })
    .collect()
}

pub fn generate(config: &GeneratorConfig) -> Result<Corpus> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let sources = default_sources();

    let articles = (0..config.count)
        .map(|i| {
            let source = sources[rng.gen_range(0..sources.len())].clone();
            let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
            let title = TITLES[rng.gen_range(0..TITLES.len())];
            let description = DESCRIPTIONS[rng.gen_range(0..DESCRIPTIONS.len())];
            let image = IMAGES[rng.gen_range(0..IMAGES.len())];
            let age = Duration::days(rng.gen_range(0..MAX_AGE_DAYS));
            let id = Builder::from_random_bytes(rng.gen()).into_uuid();

            let mut paragraphs = vec![description];
            paragraphs.extend_from_slice(BODY_PARAGRAPHS);

            Article {
                id: id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                content: paragraphs.join("\n\n"),
                url: format!("https://example.com/article/{}", i),
                image: image.to_string(),
                published_at: config.reference_time - age,
                source,
                category,
            }
        })
        .collect();

    Corpus::new(sources, articles)
}
