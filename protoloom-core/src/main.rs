//! Sandbox throughput benchmark: how fast can the preview pipeline build
//! a fresh isolated context, render a unit, and replay interactions.

#[path = "studio/sandbox/mod.rs"]
mod sandbox;

use sandbox::{loader, supervisor, vm::UnitSandbox};
use std::time::{Duration, Instant};

const TOTAL_RENDERS: usize = 500;
const CLICKS_PER_RENDER: usize = 3;

const SAMPLE_UNIT: &str = r#"
function GeneratedComponent()
    local count, setCount = useState(0)
    return h("div", { class = "flex flex-col gap-4 p-6" }, {
        h("text", { id = "count", text = "Count: " .. count, class = "text-2xl font-bold" }),
        h("button", { text = "Increment", onClick = function() setCount(count + 1) end }),
        Heart({ size = 16 }),
    })
end
"#;

fn main() {
    let start = Instant::now();
    let executable = loader::prepare(SAMPLE_UNIT);

    let mut durations: Vec<Duration> = Vec::with_capacity(TOTAL_RENDERS);
    let mut min_duration = Duration::MAX;
    let mut max_duration = Duration::ZERO;
    let mut clicks = 0usize;

    for _ in 0..TOTAL_RENDERS {
        let render_start = Instant::now();

        let sandbox = UnitSandbox::create().expect("sandbox creation failed");
        supervisor::run(&sandbox.lua, &executable, SAMPLE_UNIT).expect("render failed");
        for _ in 0..CLICKS_PER_RENDER {
            supervisor::click(&sandbox.lua, 1).expect("click failed");
            clicks += 1;
        }

        let elapsed = render_start.elapsed();
        durations.push(elapsed);
        min_duration = min_duration.min(elapsed);
        max_duration = max_duration.max(elapsed);
    }

    let total = start.elapsed();
    durations.sort();
    let p50 = durations[durations.len() / 2];
    let p95 = durations[durations.len() * 95 / 100];
    let p99 = durations[durations.len() * 99 / 100];
    let mean: Duration = durations.iter().sum::<Duration>() / durations.len() as u32;

    println!("\n=== SANDBOX STRESS RESULTS ===\n");
    println!("Configuration:");
    println!("  Renders: {}", TOTAL_RENDERS);
    println!("  Clicks per render: {}", CLICKS_PER_RENDER);
    println!("  Total interactions: {}\n", clicks);

    println!("Performance:");
    println!("  Duration: {:.2}s", total.as_secs_f64());
    println!(
        "  Renders/Second: {:.1}",
        TOTAL_RENDERS as f64 / total.as_secs_f64()
    );

    println!("\nRender Duration Statistics:");
    println!("  Min: {:?}", min_duration);
    println!("  Max: {:?}", max_duration);
    println!("  Mean: {:?}", mean);
    println!("  Median (p50): {:?}", p50);
    println!("  p95: {:?}", p95);
    println!("  p99: {:?}", p99);
}
