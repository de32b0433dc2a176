//! Entry animations for the landing page sections.
//!
//! The browser's timeline library does the actual work; this module only
//! describes what to animate. Each tween animates *from* the given offsets
//! to the element's resting state.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TweenFrom {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScrollTrigger {
    /// `None` triggers on the animated element itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<&'static str>,
    pub start: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle_actions: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tween {
    pub target: &'static str,
    pub from: TweenFrom,
    pub duration: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stagger: Option<f32>,
    /// Timeline position relative to the previous tween, e.g. `-=1.5`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f32>,
    /// Create one tween per matched element instead of one for the group.
    pub per_element: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_trigger: Option<ScrollTrigger>,
}

impl Tween {
    fn new(target: &'static str, from: TweenFrom, duration: f32) -> Self {
        Self {
            target,
            from,
            duration,
            ease: None,
            stagger: None,
            position: None,
            delay: None,
            per_element: false,
            scroll_trigger: None,
        }
    }

    fn ease(mut self, ease: &'static str) -> Self {
        self.ease = Some(ease);
        self
    }

    fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = Some(stagger);
        self
    }

    fn at(mut self, position: &'static str) -> Self {
        self.position = Some(position);
        self
    }

    fn delay(mut self, delay: f32) -> Self {
        self.delay = Some(delay);
        self
    }

    fn per_element(mut self) -> Self {
        self.per_element = true;
        self
    }

    fn on_scroll(mut self, trigger: ScrollTrigger) -> Self {
        self.scroll_trigger = Some(trigger);
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnimationSequence {
    pub name: &'static str,
    /// Tweens play in order on a single timeline; otherwise each is independent.
    pub timeline: bool,
    pub tweens: Vec<Tween>,
}

fn fade(opacity: f32) -> TweenFrom {
    TweenFrom {
        opacity: Some(opacity),
        ..TweenFrom::default()
    }
}

pub fn hero() -> AnimationSequence {
    AnimationSequence {
        name: "hero",
        timeline: true,
        tweens: vec![
            Tween::new(
                ".hero-bg",
                TweenFrom {
                    scale: Some(1.1),
                    ..fade(0.0)
                },
                2.0,
            )
            .ease("power2.out"),
            Tween::new(
                ".hero-text-item",
                TweenFrom {
                    y: Some(100.0),
                    ..fade(0.0)
                },
                1.2,
            )
            .stagger(0.2)
            .ease("power3.out")
            .at("-=1.5"),
            Tween::new(
                ".hero-actions",
                TweenFrom {
                    y: Some(20.0),
                    ..fade(0.0)
                },
                1.0,
            )
            .ease("power2.out")
            .at("-=0.5"),
            Tween::new(
                ".hero-scroll",
                TweenFrom {
                    y: Some(-20.0),
                    ..fade(0.0)
                },
                1.0,
            )
            .delay(0.5),
        ],
    }
}

pub fn services() -> AnimationSequence {
    AnimationSequence {
        name: "services",
        timeline: false,
        tweens: vec![
            Tween::new(
                ".service-item",
                TweenFrom {
                    y: Some(50.0),
                    ..fade(0.0)
                },
                1.0,
            )
            .ease("power3.out")
            .per_element()
            .on_scroll(ScrollTrigger {
                trigger: None,
                start: "top 85%",
                toggle_actions: Some("play none none reverse"),
            }),
            Tween::new(
                ".sidebar-promo",
                TweenFrom {
                    x: Some(50.0),
                    ..fade(0.0)
                },
                1.5,
            )
            .ease("power3.out")
            .on_scroll(ScrollTrigger {
                trigger: Some(".sidebar-promo"),
                start: "top 80%",
                toggle_actions: None,
            }),
        ],
    }
}

pub fn gallery() -> AnimationSequence {
    AnimationSequence {
        name: "gallery",
        timeline: false,
        tweens: vec![Tween::new(
            ".gallery-item",
            TweenFrom {
                y: Some(100.0),
                ..fade(0.0)
            },
            1.2,
        )
        .stagger(0.2)
        .ease("power3.out")
        .on_scroll(ScrollTrigger {
            trigger: Some("#gallery"),
            start: "top 70%",
            toggle_actions: None,
        })],
    }
}

pub fn site_animations() -> Vec<AnimationSequence> {
    vec![hero(), services(), gallery()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_is_a_timeline_with_overlaps() {
        let hero = hero();
        assert!(hero.timeline);
        assert_eq!(hero.tweens.len(), 4);
        assert_eq!(hero.tweens[1].position, Some("-=1.5"));
        assert_eq!(hero.tweens[3].delay, Some(0.5));
    }

    #[test]
    fn test_service_items_trigger_individually() {
        let services = services();
        let items = &services.tweens[0];
        assert!(items.per_element);
        let trigger = items.scroll_trigger.as_ref().unwrap();
        assert!(trigger.trigger.is_none());
        assert_eq!(trigger.toggle_actions, Some("play none none reverse"));
    }

    #[test]
    fn test_serialized_shape_omits_unset_fields() {
        let json = serde_json::to_value(gallery()).unwrap();
        let tween = &json["tweens"][0];
        assert_eq!(tween["target"], ".gallery-item");
        assert_eq!(tween["from"]["y"], 100.0);
        assert!(tween["from"].get("x").is_none());
        assert!(tween.get("delay").is_none());
        assert_eq!(tween["scroll_trigger"]["trigger"], "#gallery");
    }

    #[test]
    fn test_site_animations_cover_all_sections() {
        let names: Vec<_> = site_animations().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["hero", "services", "gallery"]);
    }
}
