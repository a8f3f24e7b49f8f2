use hand_gesture::landmark::{INDEX_TIP, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP, WRIST};
use hand_gesture::{Gesture, LandmarkFrame, Point3D, Viewport};

pub const VP: Viewport = Viewport::new(1280.0, 720.0);

/// A hand making `gesture` with the index tip at screen pixel `(x, y)`.
pub fn hand(gesture: Gesture, x: f32, y: f32) -> LandmarkFrame {
    let (nx, ny) = (x / VP.width, y / VP.height);
    let extended: &[usize] = match gesture {
        Gesture::Point      => &[INDEX_TIP],
        Gesture::Palm       => &[INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP],
        Gesture::TwoFingers => &[INDEX_TIP, MIDDLE_TIP],
        Gesture::Pinch      => &[THUMB_TIP, INDEX_TIP, RING_TIP],
        Gesture::Fist       => &[],
        Gesture::Unknown    => &[MIDDLE_TIP, RING_TIP],
    };
    let index_up = extended.contains(&INDEX_TIP);
    let wrist = Point3D::new(nx, if index_up { ny + 0.45 } else { ny + 0.05 }, 0.0);

    let mut points = [Point3D::new(wrist.x, wrist.y - 0.02, 0.0); 21];
    points[WRIST] = wrist;
    for &tip in extended {
        points[tip] = Point3D::new(wrist.x + tip as f32 * 0.005, wrist.y - 0.45, 0.0);
    }
    points[INDEX_TIP] = Point3D::new(nx, ny, 0.0);
    if gesture == Gesture::Pinch {
        points[THUMB_TIP] = Point3D::new(nx + 0.03, ny, 0.0);
    }
    LandmarkFrame::new(points)
}
