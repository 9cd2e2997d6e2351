//! Story playback: walks a viewer through story groups one story at a time.
//!
//! Image stories run on a fixed timer (2% of progress every 100ms, so 5s per
//! story); video stories take their progress from the player's reported
//! position and advance on playback completion. `StoryPlayer` is the pure
//! state machine; `PlaybackDriver` owns the one live ticker and turns timer
//! ticks and viewer commands into transitions.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::plugins::feed::stories::models::{StoryDto, StoryGroup};

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const TICK_STEP: f64 = 2.0;

/// How the current story's progress is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSource {
    /// Image: a fixed 100ms ticker adds 2% per tick.
    Timed,
    /// Video: progress is position/duration reported by the media player.
    MediaDriven,
}

/// Result of applying one operation to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Entered { group: usize, story: usize },
    Stayed,
    Closed,
}

pub struct StoryPlayer {
    groups: Vec<StoryGroup>,
    group_idx: usize,
    story_idx: usize,
    progress: f64,
    closed: bool,
}

impl StoryPlayer {
    pub fn new(groups: Vec<StoryGroup>, initial_group: usize) -> Self {
        Self {
            groups,
            group_idx: initial_group,
            story_idx: 0,
            progress: 0.0,
            closed: false,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.group_idx, self.story_idx)
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn current_group(&self) -> Option<&StoryGroup> {
        self.groups.get(self.group_idx)
    }

    pub fn current_story(&self) -> Option<&StoryDto> {
        self.current_group().and_then(|g| g.stories.get(self.story_idx))
    }

    /// None when there is no current story (empty or exhausted groups).
    pub fn source(&self) -> Option<PlaybackSource> {
        self.current_story().map(|s| {
            if s.is_image {
                PlaybackSource::Timed
            } else {
                PlaybackSource::MediaDriven
            }
        })
    }

    /// Move to the next story, then the next group, then close.
    pub fn advance(&mut self) -> Step {
        if self.closed {
            return Step::Stayed;
        }
        match self.groups.get(self.group_idx) {
            Some(group) if self.story_idx + 1 < group.stories.len() => {
                self.story_idx += 1;
                self.progress = 0.0;
                Step::Entered { group: self.group_idx, story: self.story_idx }
            }
            Some(_) if self.group_idx + 1 < self.groups.len() => {
                self.group_idx += 1;
                self.story_idx = 0;
                self.progress = 0.0;
                Step::Entered { group: self.group_idx, story: self.story_idx }
            }
            _ => {
                self.closed = true;
                Step::Closed
            }
        }
    }

    /// Move to the previous story, then the last story of the previous group.
    /// At the very first story of the very first group this is a no-op.
    pub fn retreat(&mut self) -> Step {
        if self.closed {
            return Step::Stayed;
        }
        if self.story_idx > 0 {
            self.story_idx -= 1;
            self.progress = 0.0;
            Step::Entered { group: self.group_idx, story: self.story_idx }
        } else if self.group_idx > 0 {
            self.group_idx -= 1;
            self.story_idx = self
                .groups
                .get(self.group_idx)
                .map(|g| g.stories.len().saturating_sub(1))
                .unwrap_or(0);
            self.progress = 0.0;
            Step::Entered { group: self.group_idx, story: self.story_idx }
        } else {
            Step::Stayed
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    /// One 100ms tick of an image story. The tick that first reaches 100%
    /// advances immediately, so progress never sits at 100 and the advance
    /// cannot fire twice.
    pub fn tick(&mut self) -> Step {
        if self.closed || self.source() != Some(PlaybackSource::Timed) {
            return Step::Stayed;
        }
        self.progress = (self.progress + TICK_STEP).min(100.0);
        if self.progress >= 100.0 {
            self.advance()
        } else {
            Step::Stayed
        }
    }

    /// Progress of a video story as reported by the media player.
    pub fn set_media_progress(&mut self, position: f64, duration: f64) {
        if self.closed || self.source() != Some(PlaybackSource::MediaDriven) {
            return;
        }
        if duration > 0.0 {
            self.progress = (position / duration * 100.0).clamp(0.0, 100.0);
        }
    }

    /// Natural end of a video story.
    pub fn media_ended(&mut self) -> Step {
        if self.closed || self.source() != Some(PlaybackSource::MediaDriven) {
            return Step::Stayed;
        }
        self.advance()
    }

    /// Fill level of the progress segment for story `index` of the current
    /// group: full before the current story, `progress` at it, empty after.
    pub fn segment_fill(&self, index: usize) -> f64 {
        if index < self.story_idx {
            100.0
        } else if index == self.story_idx {
            self.progress
        } else {
            0.0
        }
    }
}

#[derive(Debug)]
pub enum PlayerCommand {
    Next,
    Prev,
    Close,
    MediaProgress { position: f64, duration: f64 },
    MediaEnded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Entered { group: usize, story: usize, source: PlaybackSource },
    Progress { group: usize, story: usize, percent: f64 },
    Closed,
}

/// Drives a `StoryPlayer` on the runtime: at most one ticker is live at any
/// instant, and every transition tears the previous one down before arming
/// the next.
pub struct PlaybackDriver {
    player: StoryPlayer,
    commands: mpsc::UnboundedReceiver<PlayerCommand>,
    events: mpsc::UnboundedSender<PlayerEvent>,
}

/// Spawns a driver for the supplied groups and returns the command/event
/// channel ends for the consumer.
pub fn start(
    groups: Vec<StoryGroup>,
    initial_group: usize,
) -> (mpsc::UnboundedSender<PlayerCommand>, mpsc::UnboundedReceiver<PlayerEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel();
    let driver = PlaybackDriver::new(StoryPlayer::new(groups, initial_group), cmd_rx, evt_tx);
    tokio::spawn(driver.run());
    (cmd_tx, evt_rx)
}

impl PlaybackDriver {
    pub fn new(
        player: StoryPlayer,
        commands: mpsc::UnboundedReceiver<PlayerCommand>,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Self {
        Self { player, commands, events }
    }

    pub async fn run(mut self) {
        let mut ticker = arm(&self.player);

        // empty groups: nothing to show and no timer work, but stay around
        // for an explicit Close
        if let Some(source) = self.player.source() {
            let (group, story) = self.player.position();
            if !self.emit(PlayerEvent::Entered { group, story, source }) {
                return;
            }
        }

        loop {
            tokio::select! {
                cmd = self.commands.recv() => {
                    let Some(cmd) = cmd else { break };
                    match cmd {
                        PlayerCommand::Next => {
                            let step = self.player.advance();
                            if self.apply(step, &mut ticker) {
                                break;
                            }
                        }
                        PlayerCommand::Prev => {
                            let step = self.player.retreat();
                            if self.apply(step, &mut ticker) {
                                break;
                            }
                        }
                        PlayerCommand::Close => {
                            self.player.close();
                            let _ = self.events.send(PlayerEvent::Closed);
                            break;
                        }
                        PlayerCommand::MediaProgress { position, duration } => {
                            self.player.set_media_progress(position, duration);
                            let (group, story) = self.player.position();
                            if !self.emit(PlayerEvent::Progress { group, story, percent: self.player.progress() }) {
                                break;
                            }
                        }
                        PlayerCommand::MediaEnded => {
                            let step = self.player.media_ended();
                            if self.apply(step, &mut ticker) {
                                break;
                            }
                        }
                    }
                }
                _ = next_tick(&mut ticker) => {
                    match self.player.tick() {
                        Step::Stayed => {
                            let (group, story) = self.player.position();
                            if !self.emit(PlayerEvent::Progress { group, story, percent: self.player.progress() }) {
                                break;
                            }
                        }
                        step => {
                            if self.apply(step, &mut ticker) {
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    // applies a transition; returns true when the session is over
    fn apply(&mut self, step: Step, ticker: &mut Option<Interval>) -> bool {
        match step {
            Step::Entered { group, story } => {
                // the old ticker is dropped here, before the new one starts
                *ticker = arm(&self.player);
                if let Some(source) = self.player.source() {
                    if !self.emit(PlayerEvent::Entered { group, story, source }) {
                        return true;
                    }
                }
                false
            }
            Step::Closed => {
                let _ = self.events.send(PlayerEvent::Closed);
                true
            }
            Step::Stayed => false,
        }
    }

    fn emit(&self, event: PlayerEvent) -> bool {
        self.events.send(event).is_ok()
    }
}

fn arm(player: &StoryPlayer) -> Option<Interval> {
    match player.source() {
        Some(PlaybackSource::Timed) => {
            let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(ticker)
        }
        _ => None,
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use uuid::Uuid;

    fn story(is_image: bool) -> StoryDto {
        let created = Utc::now();
        StoryDto {
            id: Uuid::new_v4(),
            wedding_event_id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            media_url: if is_image { "/uploads/a.jpg".into() } else { "/uploads/a.mp4".into() },
            is_image,
            created_at: created,
            expires_at: created + ChronoDuration::hours(24),
        }
    }

    fn group(name: &str, stories: Vec<StoryDto>) -> StoryGroup {
        StoryGroup {
            guest_id: Uuid::new_v4(),
            guest_name: name.to_string(),
            guest_avatar: None,
            stories,
        }
    }

    fn two_groups() -> Vec<StoryGroup> {
        vec![
            group("A", vec![story(true), story(true)]),
            group("B", vec![story(true)]),
        ]
    }

    #[test]
    fn advance_walks_stories_then_groups_then_closes() {
        let mut player = StoryPlayer::new(two_groups(), 0);
        assert_eq!(player.position(), (0, 0));

        assert_eq!(player.advance(), Step::Entered { group: 0, story: 1 });
        assert_eq!(player.advance(), Step::Entered { group: 1, story: 0 });
        assert_eq!(player.advance(), Step::Closed);
        assert!(player.is_closed());
    }

    #[test]
    fn retreat_crosses_group_boundary_to_last_story() {
        let mut player = StoryPlayer::new(two_groups(), 1);
        assert_eq!(player.position(), (1, 0));

        assert_eq!(player.retreat(), Step::Entered { group: 0, story: 1 });
    }

    #[test]
    fn retreat_at_origin_is_a_noop() {
        let mut player = StoryPlayer::new(two_groups(), 0);
        player.tick();
        let progress_before = player.progress();

        assert_eq!(player.retreat(), Step::Stayed);
        assert_eq!(player.position(), (0, 0));
        assert_eq!(player.progress(), progress_before);
    }

    #[test]
    fn indices_stay_in_bounds_for_any_navigation_sequence() {
        let mut player = StoryPlayer::new(two_groups(), 0);
        let ops: &[fn(&mut StoryPlayer) -> Step] =
            &[StoryPlayer::retreat, StoryPlayer::advance, StoryPlayer::advance,
              StoryPlayer::retreat, StoryPlayer::retreat, StoryPlayer::advance,
              StoryPlayer::advance, StoryPlayer::advance, StoryPlayer::advance,
              StoryPlayer::retreat];

        for op in ops {
            op(&mut player);
            if !player.is_closed() {
                let (g, s) = player.position();
                assert!(g < 2);
                assert!(s < player.current_group().map(|gr| gr.stories.len()).unwrap_or(0).max(1));
            }
        }
    }

    #[test]
    fn image_story_advances_on_the_fiftieth_tick() {
        let mut player = StoryPlayer::new(two_groups(), 0);

        for n in 1..50 {
            assert_eq!(player.tick(), Step::Stayed, "tick {}", n);
            assert_eq!(player.progress(), (n as f64) * 2.0);
        }
        assert_eq!(player.tick(), Step::Entered { group: 0, story: 1 });
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn transitions_reset_progress() {
        let mut player = StoryPlayer::new(two_groups(), 0);
        for _ in 0..10 {
            player.tick();
        }
        assert_eq!(player.progress(), 20.0);

        player.advance();
        assert_eq!(player.progress(), 0.0);

        for _ in 0..10 {
            player.tick();
        }
        player.retreat();
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn tick_does_not_move_a_video_story() {
        let mut player = StoryPlayer::new(vec![group("A", vec![story(false)])], 0);
        assert_eq!(player.source(), Some(PlaybackSource::MediaDriven));

        assert_eq!(player.tick(), Step::Stayed);
        assert_eq!(player.progress(), 0.0);
    }

    #[test]
    fn media_progress_maps_position_over_duration() {
        let mut player = StoryPlayer::new(vec![group("A", vec![story(false), story(true)])], 0);

        player.set_media_progress(2.5, 10.0);
        assert_eq!(player.progress(), 25.0);

        // out-of-range positions clamp rather than overflow the bar
        player.set_media_progress(12.0, 10.0);
        assert_eq!(player.progress(), 100.0);

        assert_eq!(player.media_ended(), Step::Entered { group: 0, story: 1 });
    }

    #[test]
    fn media_events_are_ignored_for_image_stories() {
        let mut player = StoryPlayer::new(two_groups(), 0);
        player.set_media_progress(5.0, 10.0);
        assert_eq!(player.progress(), 0.0);
        assert_eq!(player.media_ended(), Step::Stayed);
    }

    #[test]
    fn empty_groups_render_nothing_and_close_on_advance() {
        let mut player = StoryPlayer::new(vec![], 0);
        assert!(player.current_story().is_none());
        assert_eq!(player.source(), None);

        assert_eq!(player.advance(), Step::Closed);
    }

    #[test]
    fn operations_after_close_are_noops() {
        let mut player = StoryPlayer::new(two_groups(), 1);
        assert_eq!(player.advance(), Step::Closed);

        // the close was already signalled; nothing fires again
        assert_eq!(player.advance(), Step::Stayed);
        assert_eq!(player.retreat(), Step::Stayed);
        assert_eq!(player.tick(), Step::Stayed);
    }

    #[test]
    fn segment_fill_reflects_viewed_current_and_upcoming() {
        let mut player = StoryPlayer::new(vec![group("A", vec![story(true), story(true), story(true)])], 0);
        player.advance();
        for _ in 0..20 {
            player.tick();
        }

        assert_eq!(player.segment_fill(0), 100.0);
        assert_eq!(player.segment_fill(1), 40.0);
        assert_eq!(player.segment_fill(2), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_times_an_image_story_to_five_seconds() {
        let started = Instant::now();
        let (_cmd, mut events) = start(vec![group("A", vec![story(true)])], 0);

        match events.recv().await.unwrap() {
            PlayerEvent::Entered { group: 0, story: 0, source: PlaybackSource::Timed } => {}
            other => panic!("unexpected first event: {:?}", other),
        }

        let mut progress_events = 0;
        loop {
            match events.recv().await.unwrap() {
                PlayerEvent::Progress { percent, .. } => {
                    progress_events += 1;
                    assert_eq!(percent, (progress_events as f64) * 2.0);
                }
                PlayerEvent::Closed => break,
                other => panic!("unexpected event: {:?}", other),
            }
        }

        // 49 sub-100% ticks, then the 50th closes out the single story
        assert_eq!(progress_events, 49);
        assert_eq!(started.elapsed(), Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn driver_advances_groups_and_closes_once() {
        let (cmd, mut events) = start(two_groups(), 0);
        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::Entered { group: 0, story: 0, .. }));

        cmd.send(PlayerCommand::Next).unwrap();
        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::Entered { group: 0, story: 1, .. }));

        cmd.send(PlayerCommand::Next).unwrap();
        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::Entered { group: 1, story: 0, .. }));

        cmd.send(PlayerCommand::Next).unwrap();
        assert_eq!(events.recv().await.unwrap(), PlayerEvent::Closed);

        // driver has exited; no further events arrive
        assert!(events.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_runs_no_timer_for_video_stories() {
        let started = Instant::now();
        let (cmd, mut events) = start(vec![group("A", vec![story(false)])], 0);

        match events.recv().await.unwrap() {
            PlayerEvent::Entered { source: PlaybackSource::MediaDriven, .. } => {}
            other => panic!("unexpected first event: {:?}", other),
        }

        cmd.send(PlayerCommand::MediaProgress { position: 5.0, duration: 10.0 }).unwrap();
        match events.recv().await.unwrap() {
            PlayerEvent::Progress { percent, .. } => assert_eq!(percent, 50.0),
            other => panic!("unexpected event: {:?}", other),
        }

        cmd.send(PlayerCommand::MediaEnded).unwrap();
        assert_eq!(events.recv().await.unwrap(), PlayerEvent::Closed);

        // every event was command-driven: the paused clock never moved
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn driver_close_interrupts_playback() {
        let started = Instant::now();
        let (cmd, mut events) = start(two_groups(), 0);
        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::Entered { .. }));

        cmd.send(PlayerCommand::Close).unwrap();

        // drain any ticks that raced the close; the stream must end in Closed
        let mut last = None;
        while let Some(ev) = events.recv().await {
            last = Some(ev);
        }
        assert_eq!(last, Some(PlayerEvent::Closed));
        assert!(started.elapsed() < Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn driver_restarts_progress_after_manual_navigation() {
        let (cmd, mut events) = start(vec![group("A", vec![story(true), story(true)])], 0);
        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::Entered { group: 0, story: 0, .. }));

        // let a few ticks through, then jump to the next story
        let mut seen = 0.0;
        while seen < 6.0 {
            match events.recv().await.unwrap() {
                PlayerEvent::Progress { percent, .. } => seen = percent,
                other => panic!("unexpected event: {:?}", other),
            }
        }

        cmd.send(PlayerCommand::Next).unwrap();
        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::Entered { group: 0, story: 1, .. }));

        // the replacement ticker starts the new story from scratch
        match events.recv().await.unwrap() {
            PlayerEvent::Progress { percent, .. } => assert_eq!(percent, 2.0),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
