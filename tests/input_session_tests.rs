use bizchart::interaction::{
    InputDecision, InputSession, InteractionMode, PointerDevice, PointerEvent, PointerPhase,
};

#[test]
fn hover_without_buttons_is_ignored() {
    let mut session = InputSession::default();
    let decision = session.handle(PointerEvent::mouse(PointerPhase::Move, 120.0, 40.0));
    assert_eq!(decision, InputDecision::Ignore);
    assert_eq!(session.mode(), InteractionMode::Idle);
}

#[test]
fn mouse_drag_interpolates_until_release() {
    let mut session = InputSession::default();

    assert_eq!(
        session.handle(PointerEvent::mouse(PointerPhase::Down, 10.0, 0.0)),
        InputDecision::Interpolate { x: 10.0 }
    );
    assert!(session.is_dragging());
    assert_eq!(
        session.handle(PointerEvent::mouse(PointerPhase::Move, 35.0, 0.0)),
        InputDecision::Interpolate { x: 35.0 }
    );

    assert_eq!(
        session.handle(PointerEvent::mouse(PointerPhase::Up, 35.0, 0.0)),
        InputDecision::Ignore
    );
    assert!(!session.is_dragging());
    assert_eq!(
        session.handle(PointerEvent::mouse(PointerPhase::Move, 50.0, 0.0)),
        InputDecision::Ignore
    );
}

#[test]
fn move_with_held_button_interpolates_while_idle() {
    let mut session = InputSession::default();
    let event = PointerEvent::mouse(PointerPhase::Move, 77.0, 0.0).with_buttons(1);
    assert_eq!(session.handle(event), InputDecision::Interpolate { x: 77.0 });
}

#[test]
fn touch_moves_always_interpolate() {
    let mut session = InputSession::default();
    assert_eq!(
        session.handle(PointerEvent::touch(4, PointerPhase::Move, 12.5, 3.0)),
        InputDecision::Interpolate { x: 12.5 }
    );
}

#[test]
fn captured_pointer_keeps_driving_outside_bounds_and_leave_is_ignored() {
    let mut session = InputSession::default();
    session.handle(PointerEvent::touch(7, PointerPhase::Down, 10.0, 0.0));
    assert_eq!(
        session.mode(),
        InteractionMode::Dragging {
            pointer_id: 7,
            device: PointerDevice::Touch
        }
    );

    assert_eq!(
        session.handle(PointerEvent::touch(7, PointerPhase::Leave, -40.0, 0.0)),
        InputDecision::Ignore
    );
    assert_eq!(
        session.handle(PointerEvent::touch(7, PointerPhase::Move, -40.0, 0.0)),
        InputDecision::Interpolate { x: -40.0 }
    );
}

#[test]
fn other_pointers_do_not_steal_or_end_a_drag() {
    let mut session = InputSession::default();
    session.handle(PointerEvent::touch(1, PointerPhase::Down, 0.0, 0.0));

    assert_eq!(
        session.handle(PointerEvent::touch(2, PointerPhase::Down, 5.0, 0.0)),
        InputDecision::Ignore
    );
    assert_eq!(
        session.handle(PointerEvent::new(2, PointerDevice::Pen, PointerPhase::Move, 5.0, 0.0)),
        InputDecision::Ignore
    );
    session.handle(PointerEvent::touch(2, PointerPhase::Up, 5.0, 0.0));
    assert!(session.is_dragging());

    session.handle(PointerEvent::touch(1, PointerPhase::Cancel, 5.0, 0.0));
    assert!(!session.is_dragging());
}
