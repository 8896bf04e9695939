//! Frame-counted sprite animation.
//!
//! Durations are in fixed steps, not seconds: an animation with `duration = 4`
//! shows each image for four updates.

use std::rc::Rc;

use crate::components::sprite::SpriteComponent;

/// A playback cursor over a shared image sequence.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Rc<[SpriteComponent]>,
    /// Updates per image.
    duration: u32,
    looping: bool,
    /// Tick counter in `0..duration * frame_count`.
    frame: u32,
    done: bool,
}

impl Animation {
    /// Returns `None` for an empty frame list or a zero duration.
    pub fn new(frames: Vec<SpriteComponent>, duration: u32, looping: bool) -> Option<Self> {
        if frames.is_empty() || duration == 0 {
            return None;
        }
        Some(Self {
            frames: frames.into(),
            duration,
            looping,
            frame: 0,
            done: false,
        })
    }

    /// A fresh cursor over the same images. The image list is shared, not cloned.
    pub fn copy(&self) -> Self {
        Self {
            frames: Rc::clone(&self.frames),
            duration: self.duration,
            looping: self.looping,
            frame: 0,
            done: false,
        }
    }

    fn last_tick(&self) -> u32 {
        self.duration * self.frames.len() as u32 - 1
    }

    /// Advance by one tick.
    pub fn update(&mut self) {
        let total = self.duration * self.frames.len() as u32;
        if self.looping {
            self.frame = (self.frame + 1) % total;
        } else {
            self.frame = (self.frame + 1).min(self.last_tick());
            if self.frame >= self.last_tick() {
                self.done = true;
            }
        }
    }

    /// The image for the current tick.
    pub fn img(&self) -> &SpriteComponent {
        &self.frames[self.image_index()]
    }

    pub fn image_index(&self) -> usize {
        (self.frame / self.duration) as usize
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether two cursors play the same underlying image list.
    pub fn shares_frames_with(&self, other: &Animation) -> bool {
        Rc::ptr_eq(&self.frames, &other.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn three_frames(looping: bool) -> Animation {
        let frames = (0..3)
            .map(|i| SpriteComponent::new(i as f32, 0.0, Vec2::splat(16.0)))
            .collect();
        Animation::new(frames, 4, looping).unwrap()
    }

    #[test]
    fn looping_wraps_after_duration_times_count() {
        let mut anim = three_frames(true);
        for _ in 0..12 {
            anim.update();
        }
        assert_eq!(anim.frame(), 0);
        assert_eq!(anim.image_index(), 0);
        assert!(!anim.is_done());
    }

    #[test]
    fn image_index_is_tick_over_duration() {
        let mut anim = three_frames(true);
        for _ in 0..5 {
            anim.update();
        }
        assert_eq!(anim.image_index(), 1);
        assert_eq!(anim.img().col, 1.0);
    }

    #[test]
    fn non_looping_finishes_at_tick_eleven_and_clamps() {
        let mut anim = three_frames(false);
        for call in 1..=20 {
            anim.update();
            if call < 11 {
                assert!(!anim.is_done(), "done too early at call {}", call);
            }
            if call == 11 {
                assert!(anim.is_done());
            }
        }
        assert_eq!(anim.frame(), 11);
        assert_eq!(anim.image_index(), 2);
    }

    #[test]
    fn copy_shares_images_but_not_cursor() {
        let mut anim = three_frames(true);
        anim.update();
        anim.update();
        let fresh = anim.copy();
        assert_eq!(fresh.frame(), 0);
        assert_eq!(anim.frame(), 2);
        assert!(fresh.shares_frames_with(&anim));
    }

    #[test]
    fn empty_or_zero_duration_is_rejected() {
        assert!(Animation::new(Vec::new(), 4, true).is_none());
        assert!(Animation::new(vec![SpriteComponent::default()], 0, true).is_none());
    }
}
