use super::fixtures::mock_facebook_pages;
use super::types::{Channel, ChannelProfile, FacebookPage};
use crate::helpers::next_id;

#[derive(Clone, Debug)]
pub struct Catalog {
    channels: Vec<Channel>,
    pages: Vec<FacebookPage>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(mock_facebook_pages())
    }
}

impl Catalog {
    pub fn new(pages: Vec<FacebookPage>) -> Self {
        Self {
            channels: Vec::new(),
            pages,
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn pages(&self) -> &[FacebookPage] {
        &self.pages
    }

    pub fn connected_pages(&self) -> Vec<&FacebookPage> {
        self.pages.iter().filter(|page| page.is_connected).collect()
    }

    pub fn add_channel(&mut self, url: &str, profile: ChannelProfile) -> Channel {
        let profile = profile.with_defaults();
        let channel = Channel {
            id: next_id("channel"),
            url: url.to_string(),
            name: profile.name,
            subscribers: profile.subscribers,
            description: profile.description,
            tags: profile.tags,
        };
        self.channels.push(channel.clone());
        channel
    }

    pub fn remove_channel(&mut self, id: &str) -> Option<Channel> {
        let idx = self.channels.iter().position(|c| c.id == id)?;
        Some(self.channels.remove(idx))
    }

    pub fn toggle_page(&mut self, id: &str) -> Option<FacebookPage> {
        let page = self.pages.iter_mut().find(|p| p.id == id)?;
        page.is_connected = !page.is_connected;
        Some(page.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_disconnected_mock_pages() {
        let catalog = Catalog::default();
        assert_eq!(catalog.pages().len(), 3);
        assert!(catalog.connected_pages().is_empty());
        assert!(catalog.channels().is_empty());
    }

    #[test]
    fn toggle_connects_and_disconnects() {
        let mut catalog = Catalog::default();
        assert_eq!(catalog.toggle_page("fb2").map(|p| p.is_connected), Some(true));
        assert_eq!(catalog.connected_pages()[0].id, "fb2");
        assert_eq!(catalog.toggle_page("fb2").map(|p| p.is_connected), Some(false));
        assert!(catalog.toggle_page("missing").is_none());
    }

    #[test]
    fn add_channel_fills_blank_profile_fields() {
        let mut catalog = Catalog::default();
        let channel = catalog.add_channel("https://youtube.com/@x", ChannelProfile::default());
        assert_eq!(channel.name, "Unknown Channel");
        assert_eq!(channel.description, "No description found.");
        assert_eq!(channel.subscribers, "Unknown");
        assert!(channel.tags.is_empty());

        assert_eq!(catalog.remove_channel(&channel.id), Some(channel));
        assert!(catalog.channels().is_empty());
    }
}
