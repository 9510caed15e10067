//! Benchmarks for the per-tick election pass
//!
//! Measures the cost of one `elect` call at each table occupancy, for the
//! cheapest (quiet propagation) and the most expensive (collision at the end
//! of the cascade) neighbor mixes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tether_consensus::{elect, ElectionState};
use tether_topology::{
    AgentId, AgentType, BindingPolicy, BotRole, ConnectionTable, NeighborSnapshot, WalkGate,
    MAX_CONNECTIONS,
};

fn filled_table(occupancy: usize, role: BotRole) -> ConnectionTable {
    let mut table = ConnectionTable::new(AgentType::Alpha, BindingPolicy::new([[6; 4]; 4]));
    for i in 0..occupancy as u8 {
        table.admit_or_refresh(
            AgentId(10 + i),
            AgentType::Beta,
            NeighborSnapshot {
                gradient: 1 + i % 3,
                leader_id: AgentId(1),
                role,
                gate: WalkGate::Go,
            },
            50,
        );
    }
    table
}

/// Benchmark a follower settling its gradient
fn bench_propagate(c: &mut Criterion) {
    let mut group = c.benchmark_group("elect_propagate");

    for occupancy in 0..=MAX_CONNECTIONS {
        let table = filled_table(occupancy, BotRole::Follower);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(occupancy), &table, |b, table| {
            b.iter(|| {
                let mut state = ElectionState {
                    id: AgentId(7),
                    role: BotRole::Follower,
                    leader_id: AgentId(1),
                    gradient: 4,
                    conflict_count: 0,
                };
                elect(black_box(&mut state), black_box(table))
            })
        });
    }
    group.finish();
}

/// Benchmark a leader seeing rival leaders (rule six of eight)
fn bench_collision(c: &mut Criterion) {
    let mut group = c.benchmark_group("elect_collision");

    for occupancy in 1..=MAX_CONNECTIONS {
        let table = filled_table(occupancy, BotRole::Leader);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(occupancy), &table, |b, table| {
            b.iter(|| {
                let mut state = ElectionState::new(AgentId(200));
                state.role = BotRole::Leader;
                elect(black_box(&mut state), black_box(table))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_propagate, bench_collision);
criterion_main!(benches);
