// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notetouch::geometry::{Point, Rect};
use notetouch::region::Region;
use notetouch::registry::Registry;
use notetouch::resolver::resolve;
use notetouch::router::TouchRouter;
use notetouch::touch::TouchEvent;
use notetouch::trigger::{NoHaptics, Trigger, TriggerError};

const WHITE_KEY_WIDTH: f64 = 24.0;
const WHITE_KEY_HEIGHT: f64 = 120.0;
const BLACK_KEY_WIDTH: f64 = 14.0;
const BLACK_KEY_HEIGHT: f64 = 75.0;

/// Discards every note.
struct Silent;

impl Trigger<u8> for Silent {
    fn activate(&self, _: &u8) -> Result<(), TriggerError> {
        Ok(())
    }

    fn deactivate(&self, _: &u8) -> Result<(), TriggerError> {
        Ok(())
    }
}

fn is_black(note: u8) -> bool {
    matches!(note % 12, 1 | 3 | 6 | 8 | 10)
}

/// An 88-key piano from A0 to C8. White keys are mounted first so the black keys
/// sit on top of them.
fn piano() -> Vec<Region<u8>> {
    let mut white = Vec::new();
    let mut black = Vec::new();
    let mut x = 0.0;
    for note in 21..=108u8 {
        if is_black(note) {
            let left = x - BLACK_KEY_WIDTH / 2.0;
            black.push(Region::new(
                &format!("note {}", note),
                Rect::new(left, 0.0, BLACK_KEY_WIDTH, BLACK_KEY_HEIGHT),
                note,
            ));
        } else {
            white.push(Region::new(
                &format!("note {}", note),
                Rect::new(x, 0.0, WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT),
                note,
            ));
            x += WHITE_KEY_WIDTH;
        }
    }
    white.extend(black);
    white
}

fn keyboard_width() -> f64 {
    (21..=108u8).filter(|note| !is_black(*note)).count() as f64 * WHITE_KEY_WIDTH
}

fn benchmark_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let mut registry = Registry::new();
    for region in piano() {
        registry.register(region);
    }

    let width = keyboard_width();
    let points = vec![
        ("black_key", Point::new(WHITE_KEY_WIDTH, 10.0)),
        ("low_white_key", Point::new(5.0, 110.0)),
        ("high_white_key", Point::new(width - 5.0, 110.0)),
        ("miss", Point::new(width + 50.0, 50.0)),
    ];

    for (name, point) in points {
        group.bench_function(name, |b| {
            b.iter(|| black_box(resolve(&registry, black_box(point))))
        });
    }

    group.finish();
}

fn benchmark_glissando(c: &mut Criterion) {
    let mut group = c.benchmark_group("glissando");

    let width = keyboard_width();
    let mut router: TouchRouter<u8> = TouchRouter::new(Arc::new(Silent), Arc::new(NoHaptics));
    for region in piano() {
        router.register(region);
    }

    // Fingers dragged across the whole keyboard at once.
    for fingers in [1u64, 5, 10] {
        group.bench_function(BenchmarkId::new("fingers", fingers), |b| {
            b.iter(|| {
                router.handle_all(
                    (0..fingers).map(|finger| TouchEvent::began(finger, 1.0, 100.0 - finger as f64)),
                );
                let mut x = 1.0;
                while x < width {
                    for finger in 0..fingers {
                        router.handle(TouchEvent::moved(finger, x, 100.0 - finger as f64));
                    }
                    x += 4.0;
                }
                for finger in 0..fingers {
                    router.handle(TouchEvent::ended(finger, width, 100.0));
                }
                black_box(router.active_regions())
            })
        });
    }

    group.finish();
}

fn benchmark_remount(c: &mut Criterion) {
    let mut group = c.benchmark_group("remount");

    let silent = Arc::new(Silent);
    group.bench_function("piano_while_held", |b| {
        b.iter(|| {
            let mut router: TouchRouter<u8> = TouchRouter::new(silent.clone(), Arc::new(NoHaptics));
            let ids: Vec<_> = piano()
                .into_iter()
                .map(|region| router.register(region))
                .collect();
            for finger in 0..10u64 {
                router.handle(TouchEvent::began(finger, 30.0 + finger as f64 * 40.0, 50.0));
            }
            for id in ids {
                router.unregister(id);
            }
            black_box(router.cancel_all())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_resolve,
    benchmark_glissando,
    benchmark_remount
);
criterion_main!(benches);
