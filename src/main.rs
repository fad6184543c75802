use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use stagecraft_config::StagecraftConfig;
use stagecraft_scene::animation::{
    AnimationStep, FadeSettings, RectSettings, ScaleSettings, SequenceController, Vec2,
};
use stagecraft_scene::node::{Canvas, CanvasGroup, RectLayout, RectTransform, shared};
use stagecraft_scene::{
    AnimationRuntime, EasingFunction, IdleTimer, PropertyAnimatable, ScreenState, StateMachine,
    TransitionPolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Screen {
    Entry,
    Info,
}

/// Seconds after startup at which the visitor taps "next".
const NEXT_TAP_SECS: f32 = 2.0;

type Panels = Vec<Rc<RefCell<PropertyAnimatable>>>;

struct Timing {
    duration: f32,
    easing: EasingFunction,
    forward_delay: f32,
    reverse_delay: f32,
}

/// Build a screen out of a title that slides in and a body that fades in.
fn build_screen(
    id: Screen,
    runtime: &AnimationRuntime,
    timing: &Timing,
    panels: &mut Panels,
) -> Rc<RefCell<ScreenState<Screen>>> {
    let title_rect = shared(RectTransform::default());
    let title_group = shared(CanvasGroup::default());
    let offscreen = RectLayout {
        anchored_position: Vec2::new(0.0, -200.0),
        ..RectLayout::default()
    };
    let title = Rc::new(RefCell::new(
        PropertyAnimatable::new(runtime.clone())
            .with_rect(&title_rect)
            .with_group(&title_group)
            .with_rect_layout(RectSettings {
                enabled: true,
                start: offscreen,
                end: RectLayout::default(),
                duration: timing.duration,
                easing: timing.easing,
            })
            .with_fade(FadeSettings {
                enabled: true,
                duration: timing.duration,
                easing: timing.easing,
                ..FadeSettings::default()
            }),
    ));

    let body_rect = shared(RectTransform::default());
    let body_group = shared(CanvasGroup::default());
    let body = Rc::new(RefCell::new(
        PropertyAnimatable::new(runtime.clone())
            .with_rect(&body_rect)
            .with_group(&body_group)
            .with_scale(ScaleSettings {
                enabled: true,
                duration: timing.duration,
                ..ScaleSettings::default()
            })
            .with_fade(FadeSettings {
                enabled: true,
                duration: timing.duration,
                easing: timing.easing,
                ..FadeSettings::default()
            }),
    ));

    let steps = vec![
        AnimationStep::new(&title, 0.0, timing.reverse_delay),
        AnimationStep::new(&body, timing.forward_delay, timing.reverse_delay),
    ];
    let sequence = SequenceController::new(runtime.clone(), steps);
    panels.push(title);
    panels.push(body);

    let canvas = shared(Canvas::default());
    Rc::new(RefCell::new(ScreenState::new(id, canvas, sequence)))
}

fn log_events(screen: &Rc<RefCell<ScreenState<Screen>>>, frame: u32) {
    let mut screen = screen.borrow_mut();
    for event in screen.sequence_mut().drain_events() {
        log::info!("frame {frame}: {event:?}");
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = StagecraftConfig::load();
    let easing: EasingFunction = config
        .animation
        .easing
        .parse()
        .context("invalid animation.easing")?;
    let policy: TransitionPolicy = config
        .state_machine
        .transition_policy
        .parse()
        .context("invalid state_machine.transition_policy")?;
    let timing = Timing {
        duration: config.animation.duration,
        easing,
        forward_delay: config.animation.forward_delay,
        reverse_delay: config.animation.reverse_delay,
    };
    log::info!(
        "starting kiosk demo: easing={} policy={} frame_rate={}",
        easing,
        policy.name(),
        config.demo.frame_rate
    );

    let runtime = AnimationRuntime::new();
    let mut panels = Panels::new();
    let entry = build_screen(Screen::Entry, &runtime, &timing, &mut panels);
    let info = build_screen(Screen::Info, &runtime, &timing, &mut panels);

    let machine = StateMachine::with_policy(runtime.clone(), policy);
    machine.register(entry.clone());
    machine.register(info.clone());
    machine.change_state(Screen::Entry);

    let dt = config.demo.frame_secs();
    let next_tap_frame = (NEXT_TAP_SECS / dt) as u32;
    let mut idle = IdleTimer::new(config.demo.idle_timeout);

    for frame in 0..config.demo.max_frames {
        let tapped = frame == next_tap_frame;
        if tapped && machine.change_state(Screen::Info) {
            log::info!("frame {frame}: next tapped, leaving entry screen");
        }

        runtime.update(dt);
        log_events(&entry, frame);
        log_events(&info, frame);

        let on_info = machine.current_id() == Some(Screen::Info) && !machine.is_transitioning();
        if on_info && !idle.is_armed() {
            idle.arm();
        } else if !on_info && idle.is_armed() {
            idle.disarm();
        }
        if idle.tick(dt, tapped) {
            log::info!("frame {frame}: idle for {}s, returning to entry", idle.timeout());
            machine.change_state(Screen::Entry);
        }
    }

    log::info!(
        "finished after {} frames: current={:?} entry_visible={} info_visible={}",
        config.demo.max_frames,
        machine.current_id(),
        entry.borrow().is_visible(),
        info.borrow().is_visible()
    );
    Ok(())
}
