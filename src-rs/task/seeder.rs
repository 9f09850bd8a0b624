use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::types::VideoTask;
use crate::catalog::{Channel, FacebookPage, MOCK_VIDEO_TITLES};

pub const MIN_QUEUE_LEN: usize = 5;
const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub struct TaskSeeder<R: Rng = StdRng> {
    rng: R,
    titles: Vec<String>,
}

impl TaskSeeder<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TaskSeeder<R> {
    pub fn new(rng: R) -> Self {
        Self::with_titles(rng, MOCK_VIDEO_TITLES.iter().map(|t| t.to_string()).collect())
    }

    pub fn with_titles(rng: R, titles: Vec<String>) -> Self {
        Self { rng, titles }
    }

    pub fn seed(
        &mut self,
        task_count: usize,
        channels: &[Channel],
        destinations: &[&FacebookPage],
    ) -> Option<VideoTask> {
        if task_count >= MIN_QUEUE_LEN {
            return None;
        }
        let destination = destinations.first()?;
        let channel = channels.choose(&mut self.rng)?;
        let title = self.titles.choose(&mut self.rng)?.clone();

        let mut task = VideoTask::pending(self.random_id(), channel.id.clone(), title);
        task.scheduled_time = Some(Utc::now());
        task.facebook_page_id = Some(destination.id.clone());
        Some(task)
    }

    fn random_id(&mut self) -> String {
        (0..ID_LEN)
            .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}
