//! 随机图上的算法性质检查
//!
//! 所有随机图都由固定种子生成，失败可复现。

use graphlab::algorithm::{
    Bridges, EdmondsKarp, EulerianCircuit, ShortestPath, SpanningTree, Step, Target,
    TopologicalSort, Traversal, Value,
};
use graphlab::{EdgeId, Graph, GraphMode, VertexId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const ROUNDS: u64 = 30;

/// 随机边表 (a, b, 值)，端点为顶点下标
fn random_edges(rng: &mut StdRng, n: usize, m: usize, max_value: u32) -> Vec<(usize, usize, f64)> {
    let mut edges = Vec::with_capacity(m);
    while edges.len() < m {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b {
            edges.push((a, b, rng.gen_range(0..=max_value) as f64));
        }
    }
    edges
}

fn build(
    mode: GraphMode,
    n: usize,
    edges: &[(usize, usize, f64)],
    with_value: bool,
) -> (Arc<Graph>, Vec<VertexId>, Vec<EdgeId>) {
    let graph = Graph::new(mode);
    let v: Vec<VertexId> = (0..n).map(|_| graph.add_node()).collect();
    let ids = edges
        .iter()
        .map(|&(a, b, w)| {
            graph
                .add_edge(v[a], v[b], if with_value { Some(w) } else { None })
                .unwrap()
        })
        .collect();
    (graph, v, ids)
}

/// 用 BFS 统计连通分量数
fn components(graph: &Arc<Graph>) -> usize {
    let traversal = Traversal::new(graph.clone());
    let mut seen = HashSet::new();
    let mut count = 0;
    for v in graph.nodes() {
        if seen.insert(v) {
            count += 1;
            seen.extend(traversal.bfs(v).unwrap().result);
        }
    }
    count
}

#[test]
fn traversal_orders_are_permutations_of_reachable_set() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ROUNDS {
        let n = rng.gen_range(1..25);
        let m = rng.gen_range(0..n * 2);
        let edges = if n > 1 { random_edges(&mut rng, n, m, 0) } else { vec![] };
        let (graph, v, _) = build(GraphMode::Plain, n, &edges, false);
        let traversal = Traversal::new(graph);

        let start = v[rng.gen_range(0..n)];
        let bfs = traversal.bfs(start).unwrap().result;
        let dfs = traversal.dfs(start).unwrap().result;

        assert_eq!(bfs[0], start);
        assert_eq!(dfs[0], start);
        let bfs_set: HashSet<_> = bfs.iter().copied().collect();
        let dfs_set: HashSet<_> = dfs.iter().copied().collect();
        assert_eq!(bfs_set.len(), bfs.len());
        assert_eq!(dfs_set.len(), dfs.len());
        assert_eq!(bfs_set, dfs_set);
    }
}

#[test]
fn dijkstra_and_floyd_agree() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..ROUNDS {
        let n = rng.gen_range(2..15);
        let m = rng.gen_range(0..n * 3);
        let edges = random_edges(&mut rng, n, m, 20);
        let (graph, v, _) = build(GraphMode::Weighted, n, &edges, true);
        let finder = ShortestPath::new(graph.clone());

        for _ in 0..5 {
            let s = v[rng.gen_range(0..n)];
            let t = v[rng.gen_range(0..n)];
            let dijkstra = finder.dijkstra(s, t).unwrap().result;
            let floyd = finder.floyd_warshall(s, t).unwrap().result;

            match (dijkstra, floyd) {
                (None, None) => {}
                (Some(d), Some(f)) => {
                    assert!((d.total_weight - f.total_weight).abs() < 1e-9);
                    for path in [&d, &f] {
                        assert_eq!(path.vertices.first(), Some(&s));
                        assert_eq!(path.vertices.last(), Some(&t));
                        assert_eq!(path.edges.len() + 1, path.vertices.len());
                        let sum: f64 = path
                            .edges
                            .iter()
                            .map(|&e| graph.get_edge(e).unwrap().weight())
                            .sum();
                        assert!((sum - path.total_weight).abs() < 1e-9);
                    }
                }
                (d, f) => panic!("disagreement: {:?} vs {:?}", d, f),
            }
        }
    }
}

#[test]
fn prim_and_kruskal_have_equal_weight() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..ROUNDS {
        let n = rng.gen_range(2..20);
        // 先连成一条链保证连通，再加随机边
        let mut edges: Vec<(usize, usize, f64)> = (1..n)
            .map(|i| (rng.gen_range(0..i), i, rng.gen_range(0..50) as f64))
            .collect();
        let extra = rng.gen_range(0..n * 2);
        edges.extend(random_edges(&mut rng, n, extra, 50));
        let (graph, v, _) = build(GraphMode::Weighted, n, &edges, true);
        let mst = SpanningTree::new(graph);

        let prim = mst.prim(v[rng.gen_range(0..n)]).unwrap().result.unwrap();
        let kruskal = mst.kruskal().unwrap().result.unwrap();
        assert_eq!(prim.edges.len(), n - 1);
        assert_eq!(kruskal.edges.len(), n - 1);
        assert!((prim.total_weight - kruskal.total_weight).abs() < 1e-9);
    }
}

#[test]
fn max_flow_equals_min_cut_and_conserves_flow() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..ROUNDS {
        let n = rng.gen_range(2..12);
        let m = rng.gen_range(0..n * 3);
        let edges = random_edges(&mut rng, n, m, 10);
        let (graph, v, ids) = build(GraphMode::Capacitated, n, &edges, true);

        let source = v[0];
        let sink = v[n - 1];
        let flow = EdmondsKarp::new(graph.clone())
            .max_flow(source, sink)
            .unwrap()
            .result;

        let cut_capacity: u64 = flow
            .cut_edges()
            .iter()
            .map(|&e| graph.get_edge(e).unwrap().capacity().unwrap())
            .sum();
        assert_eq!(flow.value, cut_capacity);

        let mut net: HashMap<VertexId, i64> = HashMap::new();
        for &e in &ids {
            let edge = graph.get_edge(e).unwrap();
            let f = flow.flow_of(e);
            assert!(f <= edge.capacity().unwrap());
            *net.entry(edge.a()).or_default() -= f as i64;
            *net.entry(edge.b()).or_default() += f as i64;
        }
        for &x in &v {
            let balance = net.get(&x).copied().unwrap_or(0);
            if x == source {
                assert_eq!(balance, -(flow.value as i64));
            } else if x == sink {
                assert_eq!(balance, flow.value as i64);
            } else {
                assert_eq!(balance, 0);
            }
        }
    }
}

/// 每个顶点的净流入量
fn balances(graph: &Graph, flows: &HashMap<EdgeId, u64>) -> HashMap<VertexId, i128> {
    let mut net: HashMap<VertexId, i128> = HashMap::new();
    for (&e, &f) in flows {
        let edge = graph.get_edge(e).unwrap();
        *net.entry(edge.a()).or_default() -= f as i128;
        *net.entry(edge.b()).or_default() += f as i128;
    }
    net
}

#[test]
fn max_flow_trace_conserves_flow_after_each_augmentation() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..ROUNDS {
        let n = rng.gen_range(2..12);
        let m = rng.gen_range(0..n * 3);
        let edges = random_edges(&mut rng, n, m, 10);
        let (graph, v, _) = build(GraphMode::Capacitated, n, &edges, true);

        let source = v[0];
        let sink = v[n - 1];
        let run = EdmondsKarp::new(graph.clone())
            .max_flow(source, sink)
            .unwrap();

        let mut flows: HashMap<EdgeId, u64> = HashMap::new();
        let mut pushed = 0i128;
        let mut augmentations = 0usize;
        for step in run.trace.steps() {
            // 新路径或终止步骤之前，上一轮增广的所有更新都已应用
            if matches!(step, Step::SelectPath { .. } | Step::Result(_)) {
                let net = balances(&graph, &flows);
                for &x in &v {
                    let balance = net.get(&x).copied().unwrap_or(0);
                    if x == source {
                        assert_eq!(balance, -pushed);
                    } else if x == sink {
                        assert_eq!(balance, pushed);
                    } else {
                        assert_eq!(balance, 0, "unbalanced at {}", x);
                    }
                }
            }

            match step {
                Step::SelectPath { amount, .. } => {
                    pushed += *amount as i128;
                    augmentations += 1;
                }
                Step::UpdateValue {
                    target: Target::Edge(e),
                    value: Value::Flow { flow, capacity },
                } => {
                    assert_eq!(Some(*capacity), graph.get_edge(*e).unwrap().capacity());
                    assert!(flow <= capacity);
                    flows.insert(*e, *flow);
                }
                Step::Result(_) => {}
                other => panic!("unexpected step in max-flow trace: {:?}", other),
            }
        }

        assert_eq!(augmentations, run.result.augmenting_paths);
        assert_eq!(pushed, run.result.value as i128);
    }
}

#[test]
fn bridge_removal_splits_components() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..ROUNDS {
        let n = rng.gen_range(2..14);
        let m = rng.gen_range(1..n * 2);
        let edges = random_edges(&mut rng, n, m, 0);
        let (graph, _, ids) = build(GraphMode::Plain, n, &edges, false);
        let before = components(&graph);
        let bridges: HashSet<EdgeId> = Bridges::new(graph).find().unwrap().result.into_iter().collect();

        for (i, id) in ids.iter().enumerate() {
            let mut rest = edges.clone();
            rest.remove(i);
            let (without, _, _) = build(GraphMode::Plain, n, &rest, false);
            let after = components(&without);
            if bridges.contains(id) {
                assert_eq!(after, before + 1, "edge {} should be a bridge", id);
            } else {
                assert_eq!(after, before, "edge {} should not be a bridge", id);
            }
        }
    }
}

#[test]
fn eulerian_circuit_is_closed_walk_over_all_edges() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..ROUNDS {
        let n = rng.gen_range(3..12);
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);

        // 一个哈密顿圈加若干随机三角形，所有度都是偶数
        let mut edges: Vec<(usize, usize, f64)> =
            (0..n).map(|i| (order[i], order[(i + 1) % n], 0.0)).collect();
        for _ in 0..rng.gen_range(0..4) {
            let mut tri: Vec<usize> = (0..n).collect();
            tri.shuffle(&mut rng);
            edges.push((tri[0], tri[1], 0.0));
            edges.push((tri[1], tri[2], 0.0));
            edges.push((tri[2], tri[0], 0.0));
        }
        let (graph, _, _) = build(GraphMode::Plain, n, &edges, false);

        let circuit = EulerianCircuit::new(graph.clone())
            .find()
            .unwrap()
            .result
            .unwrap();
        assert_eq!(circuit.len(), edges.len());
        assert_eq!(circuit.iter().collect::<HashSet<_>>().len(), circuit.len());

        let first = graph.get_edge(circuit[0]).unwrap();
        let closed = [first.a(), first.b()].into_iter().any(|start| {
            let mut at = start;
            for &e in &circuit {
                match graph.get_edge(e).unwrap().other(at) {
                    Some(next) => at = next,
                    None => return false,
                }
            }
            at == start
        });
        assert!(closed);

        // 去掉一条边后出现奇度顶点
        graph.delete_edge(circuit[0]);
        assert!(EulerianCircuit::new(graph).find().unwrap().result.is_none());
    }
}

#[test]
fn topological_order_respects_edges() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..ROUNDS {
        let n = rng.gen_range(2..20);
        let mut rank: Vec<usize> = (0..n).collect();
        rank.shuffle(&mut rng);

        // 只从低秩指向高秩，得到无环图
        let m = rng.gen_range(0..n * 2);
        let edges: Vec<(usize, usize, f64)> = random_edges(&mut rng, n, m, 0)
            .into_iter()
            .map(|(a, b, w)| if rank[a] < rank[b] { (a, b, w) } else { (b, a, w) })
            .collect();
        let (graph, v, _) = build(GraphMode::Directed, n, &edges, false);

        let order = TopologicalSort::new(graph.clone())
            .sort()
            .unwrap()
            .result
            .unwrap();
        assert_eq!(order.len(), n);
        let position: HashMap<VertexId, usize> =
            order.iter().enumerate().map(|(i, &x)| (x, i)).collect();
        for &(a, b, _) in &edges {
            assert!(position[&v[a]] < position[&v[b]]);
        }

        if let Some(&(a, b, _)) = edges.first() {
            graph.add_edge(v[b], v[a], None).unwrap();
            assert!(TopologicalSort::new(graph).sort().unwrap().result.is_none());
        }
    }
}
