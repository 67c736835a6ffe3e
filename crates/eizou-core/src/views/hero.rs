use crate::models::Catalog;
use crate::node::Node;

use super::episodes_href;

const HERO_PILL: &str = "Hindi Dub • Updated";

/// One hero banner slide.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroSlide {
    pub anime_id: String,
    pub title: String,
    pub meta: String,
    pub poster: String,
    pub pill: &'static str,
    pub watch_href: String,
}

/// Direction of a manual carousel move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Prev,
}

/// Hero carousel over all anime ordered by popularity, most popular first.
///
/// Navigation wraps in both directions. Manual moves (`next`, `prev`,
/// `swipe`) mean the auto-advance timer has to be restarted by the owner.
#[derive(Debug, Clone)]
pub struct HeroCarousel {
    slides: Vec<HeroSlide>,
    index: usize,
}

impl HeroCarousel {
    pub fn new(catalog: &Catalog) -> Self {
        let slides = catalog
            .sorted_desc_by(|a| a.popularity)
            .into_iter()
            .map(|a| HeroSlide {
                anime_id: a.id.clone(),
                title: a.title.clone(),
                meta: format!("{} Seasons", a.seasons.len()),
                poster: a.poster.clone(),
                pill: HERO_PILL,
                watch_href: episodes_href(&a.id),
            })
            .collect();
        Self { slides, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&HeroSlide> {
        self.slides.get(self.index)
    }

    /// Timer-driven step forward.
    pub fn advance(&mut self) -> Option<&HeroSlide> {
        self.next()
    }

    pub fn next(&mut self) -> Option<&HeroSlide> {
        if self.slides.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.slides.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<&HeroSlide> {
        if self.slides.is_empty() {
            return None;
        }
        let len = self.slides.len();
        self.index = (self.index + len - 1) % len;
        self.current()
    }

    /// Apply a horizontal swipe or drag from `start_x` to `end_x`.
    ///
    /// A leftward move beyond `threshold` pixels goes to the next slide, a
    /// rightward one to the previous. Anything shorter is ignored.
    pub fn swipe(&mut self, start_x: f32, end_x: f32, threshold: f32) -> Option<SwipeDirection> {
        let direction = if start_x - end_x > threshold {
            SwipeDirection::Next
        } else if end_x - start_x > threshold {
            SwipeDirection::Prev
        } else {
            return None;
        };
        match direction {
            SwipeDirection::Next => self.next(),
            SwipeDirection::Prev => self.prev(),
        };
        Some(direction)
    }
}

pub fn render(carousel: &HeroCarousel) -> Node {
    let Some(slide) = carousel.current() else {
        return Node::Empty;
    };

    Node::el("section").class("hero-inner").children([
        Node::el("img")
            .id("hero-poster")
            .attr("src", slide.poster.as_str())
            .attr("alt", slide.title.as_str()),
        Node::el("span").id("hero-pill").class("pill").text(slide.pill),
        Node::el("h1").id("hero-title").text(slide.title.as_str()),
        Node::el("p").id("hero-meta").text(slide.meta.as_str()),
        Node::el("a")
            .id("hero-watch-btn")
            .class("btn-primary")
            .attr("href", slide.watch_href.as_str())
            .text("Watch Now"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Anime;

    fn anime(id: &str, popularity: f64) -> Anime {
        Anime {
            id: id.into(),
            title: id.to_uppercase(),
            poster: format!("{id}.jpg"),
            description: String::new(),
            popularity,
            trending: 0.0,
            updated: 0,
            seasons: vec![],
        }
    }

    fn carousel() -> HeroCarousel {
        HeroCarousel::new(&Catalog::new(vec![
            anime("low", 10.0),
            anime("high", 20.0),
            anime("mid", 15.0),
        ]))
    }

    #[test]
    fn test_initial_slide_is_most_popular() {
        let c = carousel();
        let slide = c.current().unwrap();
        assert_eq!(slide.anime_id, "high");
        assert_eq!(slide.meta, "0 Seasons");
        assert_eq!(slide.watch_href, "episodes.html?id=high");
    }

    #[test]
    fn test_wraps_both_directions() {
        let mut c = carousel();
        assert_eq!(c.prev().unwrap().anime_id, "low");
        assert_eq!(c.next().unwrap().anime_id, "high");
        c.advance();
        c.advance();
        assert_eq!(c.current().unwrap().anime_id, "low");
        assert_eq!(c.advance().unwrap().anime_id, "high");
    }

    #[test]
    fn test_swipe_threshold() {
        let mut c = carousel();
        assert_eq!(c.swipe(200.0, 160.0, 50.0), None);
        assert_eq!(c.index(), 0);
        // Exactly the threshold is not a swipe, in either direction.
        assert_eq!(c.swipe(200.0, 150.0, 50.0), None);
        assert_eq!(c.swipe(150.0, 200.0, 50.0), None);
        assert_eq!(c.index(), 0);

        assert_eq!(c.swipe(200.0, 100.0, 50.0), Some(SwipeDirection::Next));
        assert_eq!(c.current().unwrap().anime_id, "mid");

        assert_eq!(c.swipe(100.0, 300.0, 50.0), Some(SwipeDirection::Prev));
        assert_eq!(c.current().unwrap().anime_id, "high");
    }

    #[test]
    fn test_empty_catalog_is_inert() {
        let mut c = HeroCarousel::new(&Catalog::default());
        assert!(c.current().is_none());
        assert!(c.next().is_none());
        assert!(render(&c).is_empty());
    }

    #[test]
    fn test_render() {
        let node = render(&carousel());
        assert_eq!(node.find_id("hero-title").unwrap().text_content(), "HIGH");
        assert_eq!(
            node.find_id("hero-poster").unwrap().get_attr("src"),
            Some("high.jpg")
        );
        assert_eq!(
            node.find_id("hero-pill").unwrap().text_content(),
            "Hindi Dub • Updated"
        );
    }
}
