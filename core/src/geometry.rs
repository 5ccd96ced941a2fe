//! Integer collision geometry: point-to-segment distance, the ship triangle
//! and circle overlap. Everything works on squared distances.

use crate::constants::*;
use crate::fixed_point::rotate;
use crate::types::{Asteroid, GameObject};

/// Squared distance from `p` to the segment `a..b`.
///
/// The projection parameter is scaled to 0..=256 and clamped to the segment.
/// A zero-length segment degenerates to point distance.
pub fn distance_to_segment_sq(p: (i32, i32), a: (i32, i32), b: (i32, i32)) -> i32 {
    let (px, py) = p;
    let (x1, y1) = a;
    let dx = b.0 - x1;
    let dy = b.1 - y1;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0 {
        let ex = px - x1;
        let ey = py - y1;
        return ex * ex + ey * ey;
    }

    let dot = ((px - x1) * dx + (py - y1) * dy) as i64;
    let t = ((dot * 256) / len_sq as i64).clamp(0, 256) as i32;

    let cx = x1 + ((dx * t) >> 8);
    let cy = y1 + ((dy * t) >> 8);
    let ex = px - cx;
    let ey = py - cy;
    ex * ex + ey * ey
}

/// The ship's triangle in screen pixels: nose first, then the two rear corners.
///
/// `back_inset` pulls the rear corners towards the centre; the drawn outline
/// uses [`PLAYER_BACK_INSET`], the hitbox [`PLAYER_HITBOX_INSET`].
pub fn ship_triangle(ship: &GameObject, back_inset: i32) -> [(i32, i32); 3] {
    let (cx, cy) = ship.box_center();
    let offset = ship.width / 2;
    let front = offset + PLAYER_FRONT_EXTEND;
    let rear_x = -offset + back_inset;
    let rear_y = offset - back_inset;

    [(front, 0), (rear_x, rear_y), (rear_x, -rear_y)].map(|(x, y)| {
        let (rx, ry) = rotate(x, y, ship.angle);
        (cx + rx, cy + ry)
    })
}

/// True if `p` lies within `threshold` pixels of any edge of the ship hitbox.
///
/// This is outline proximity: a point deep inside a large triangle would not
/// register, but the ship is small enough that every interior point is close
/// to an edge.
pub fn point_near_ship_triangle(p: (i32, i32), ship: &GameObject, threshold: i32) -> bool {
    let v = ship_triangle(ship, PLAYER_HITBOX_INSET);
    let threshold_sq = threshold * threshold;
    (0..3).any(|i| distance_to_segment_sq(p, v[i], v[(i + 1) % 3]) <= threshold_sq)
}

#[inline]
pub fn circles_overlap(a: (i32, i32), ra: i32, b: (i32, i32), rb: i32) -> bool {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    let r = ra + rb;
    dx * dx + dy * dy <= r * r
}

/// Visual radius for a persisted asteroid size code.
pub fn asteroid_radius(code: i32) -> i32 {
    match code {
        ASTEROID_SIZE_L => ASTEROID_RADIUS_L,
        ASTEROID_SIZE_M => ASTEROID_RADIUS_M,
        ASTEROID_SIZE_S => ASTEROID_RADIUS_S,
        _ => ASTEROID_RADIUS_FALLBACK,
    }
}

/// Hit radius: large and medium asteroids shrink by one pixel, small ones don't.
#[inline]
pub fn collision_radius(visual_radius: i32) -> i32 {
    if visual_radius <= 3 {
        visual_radius
    } else {
        visual_radius - 1
    }
}

fn asteroid_hit_radius(asteroid: &Asteroid) -> i32 {
    collision_radius(asteroid_radius(asteroid.size.code()))
}

pub fn ship_hits_asteroid(ship: &GameObject, asteroid: &Asteroid) -> bool {
    let center = (asteroid.obj.pixel_x(), asteroid.obj.pixel_y());
    point_near_ship_triangle(center, ship, asteroid_hit_radius(asteroid))
}

/// Bullets use their width as radius.
pub fn bullet_hits_asteroid(bullet: &GameObject, asteroid: &Asteroid) -> bool {
    circles_overlap(
        (bullet.pixel_x(), bullet.pixel_y()),
        bullet.width,
        (asteroid.obj.pixel_x(), asteroid.obj.pixel_y()),
        asteroid_hit_radius(asteroid),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AsteroidSize;

    fn ship_at(x: i32, y: i32, angle: i32) -> GameObject {
        let mut ship = GameObject::spawn(PLAYER_SIZE, PLAYER_SIZE, x, y, 0);
        ship.angle = angle;
        ship
    }

    fn asteroid_at(x: i32, y: i32, size: AsteroidSize) -> Asteroid {
        Asteroid {
            obj: GameObject::spawn(size.code(), size.code(), x, y, 0),
            size,
        }
    }

    #[test]
    fn test_segment_endpoint_is_zero() {
        assert_eq!(distance_to_segment_sq((3, 4), (3, 4), (10, 4)), 0);
        assert_eq!(distance_to_segment_sq((10, 4), (3, 4), (10, 4)), 0);
    }

    #[test]
    fn test_degenerate_segment_is_point_distance() {
        assert_eq!(distance_to_segment_sq((3, 4), (0, 0), (0, 0)), 25);
    }

    #[test]
    fn test_segment_projection_clamps() {
        // Perpendicular foot inside the segment
        assert_eq!(distance_to_segment_sq((5, 3), (0, 0), (10, 0)), 9);
        // Beyond the far end: distance to the endpoint
        assert_eq!(distance_to_segment_sq((13, 4), (0, 0), (10, 0)), 25);
        // Before the near end
        assert_eq!(distance_to_segment_sq((-3, 0), (0, 0), (10, 0)), 9);
    }

    #[test]
    fn test_ship_triangle_facing_east() {
        // Top-left (100, 50) puts the centre at (104, 54)
        let ship = ship_at(100, 50, 0);
        let hitbox = ship_triangle(&ship, PLAYER_HITBOX_INSET);
        assert_eq!(hitbox, [(110, 54), (101, 57), (101, 51)]);
        let outline = ship_triangle(&ship, PLAYER_BACK_INSET);
        assert_eq!(outline, [(110, 54), (102, 56), (102, 52)]);
    }

    #[test]
    fn test_ship_triangle_facing_up() {
        let ship = ship_at(100, 50, 270);
        let v = ship_triangle(&ship, PLAYER_HITBOX_INSET);
        // Nose points towards negative y
        assert_eq!(v[0], (104, 48));
    }

    #[test]
    fn test_collision_radius_shrinks_only_large_and_medium() {
        assert_eq!(collision_radius(asteroid_radius(ASTEROID_SIZE_L)), 9);
        assert_eq!(collision_radius(asteroid_radius(ASTEROID_SIZE_M)), 5);
        assert_eq!(collision_radius(asteroid_radius(ASTEROID_SIZE_S)), 3);
        assert_eq!(asteroid_radius(7), ASTEROID_RADIUS_FALLBACK);
    }

    #[test]
    fn test_ship_hit_by_nearby_asteroid() {
        let ship = ship_at(100, 50, 0);
        // 9 px past the nose: exactly at the large hit radius
        assert!(ship_hits_asteroid(&ship, &asteroid_at(119, 54, AsteroidSize::Large)));
        assert!(!ship_hits_asteroid(&ship, &asteroid_at(120, 54, AsteroidSize::Large)));
        assert!(!ship_hits_asteroid(&ship, &asteroid_at(120, 54, AsteroidSize::Small)));
    }

    #[test]
    fn test_bullet_circle_test() {
        let bullet = GameObject::spawn(BULLET_SIZE, BULLET_SIZE, 50, 50, 0);
        // bullet radius 2 + large hit radius 9 = 11
        assert!(bullet_hits_asteroid(&bullet, &asteroid_at(61, 50, AsteroidSize::Large)));
        assert!(!bullet_hits_asteroid(&bullet, &asteroid_at(62, 50, AsteroidSize::Large)));
        // small asteroids keep their full radius 3 -> 5
        assert!(bullet_hits_asteroid(&bullet, &asteroid_at(53, 54, AsteroidSize::Small)));
    }
}
