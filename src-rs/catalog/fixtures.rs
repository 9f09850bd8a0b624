use super::types::FacebookPage;

pub const MOCK_VIDEO_TITLES: [&str; 8] = [
    "Top 10 AI Tools in 2024",
    "How to Cook Perfect Pasta",
    "Travel Vlog: Japan Diaries",
    "Coding a React App from Scratch",
    "Unboxing the New iPhone",
    "Morning Yoga Routine",
    "Crypto Market Analysis",
    "Funny Cat Compilation #42",
];

pub fn mock_facebook_pages() -> Vec<FacebookPage> {
    [
        ("fb1", "Tech Daily", 12_500, "Technology"),
        ("fb2", "Viral Shorts", 45_000, "Entertainment"),
        ("fb3", "Healthy Living", 8_900, "Lifestyle"),
    ]
    .into_iter()
    .map(|(id, name, followers, category)| FacebookPage {
        id: id.to_string(),
        name: name.to_string(),
        followers,
        category: category.to_string(),
        is_connected: false,
    })
    .collect()
}
