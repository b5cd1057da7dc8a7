//! The move tree: every candidate move from the root position, each with the
//! opponent's rated replies nested below it, built to a fixed depth and
//! consumed once to pick the principal variation.
//!
//! Nodes own their children outright; dropping a node drops its whole
//! subtree. Root subtrees are built in parallel on the worker pool, which is
//! safe because every task owns its cloned position and its own subtree
//! until the pool joins.

use crate::chess::core::Move;
use crate::chess::position::Position;
use crate::evaluation::{rate_move, RatedMove, Weights};
use crate::search::{pool, Depth};

/// Ratings beyond this magnitude mean the game is decided on that branch;
/// such nodes are not expanded further.
const RESOLVED_SCORE: i32 = 10_000;

/// One move in the tree together with the opponent's rated replies to it.
#[derive(Debug)]
pub struct Node {
    rated: RatedMove,
    replies: Vec<Node>,
}

impl Node {
    #[allow(missing_docs)]
    #[must_use]
    pub fn rated(&self) -> RatedMove {
        self.rated
    }

    /// The opponent's replies, best-rated first. Empty for leaves.
    #[must_use]
    pub fn replies(&self) -> &[Node] {
        &self.replies
    }

    /// The negamax value of the node for the player who made its move: the
    /// node's own rating if it is a leaf, otherwise the negation of the best
    /// reply's backed-up value.
    #[must_use]
    pub fn backed_up_score(&self) -> i32 {
        match self.replies.iter().map(Self::backed_up_score).max() {
            None => self.rated.score,
            Some(best_reply) => -best_reply,
        }
    }
}

/// A rooted tree of rated continuations from an initial position.
#[derive(Debug)]
pub struct MoveTree {
    root: Position,
    children: Vec<Node>,
}

impl MoveTree {
    /// The position the tree was built from.
    #[must_use]
    pub const fn root(&self) -> &Position {
        &self.root
    }

    /// The rated moves available at the root, best-rated first.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Picks the root move with the best backed-up value, breaking ties by
    /// the higher immediate rating. `None` when the root has no legal moves.
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.best_child().map(|node| node.rated.next_move)
    }

    /// The principal variation: the sequence of moves both sides are assumed
    /// to play under the backed-up values.
    #[must_use]
    pub fn principal_variation(&self) -> Vec<RatedMove> {
        let mut line = Vec::new();
        let mut node = self.best_child();
        while let Some(current) = node {
            line.push(current.rated);
            node = best_of(&current.replies);
        }
        line
    }

    fn best_child(&self) -> Option<&Node> {
        best_of(&self.children)
    }
}

fn best_of(nodes: &[Node]) -> Option<&Node> {
    nodes
        .iter()
        .max_by_key(|node| (node.backed_up_score(), node.rated.score))
}

/// Builds [`MoveTree`]s for a position: rate, sort, recurse, with root
/// subtrees optionally spread over the worker pool.
pub struct TreeBuilder<'a> {
    weights: &'a Weights,
    pool_size: usize,
}

impl<'a> TreeBuilder<'a> {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(weights: &'a Weights, pool_size: usize) -> Self {
        Self { weights, pool_size }
    }

    /// Builds the tree of the given depth (in plies) rooted at the position.
    ///
    /// Depth 1 rates the root moves and nothing below them. Parallel root
    /// expansion kicks in for deeper trees when the pool has more than one
    /// worker; shallow trees are cheaper to build inline than to dispatch.
    #[must_use]
    pub fn build(&self, root: &Position, depth: Depth) -> MoveTree {
        let ranked = self.rank_moves(root);
        let remaining = depth.saturating_sub(1);
        let expand_child = |rated: RatedMove| {
            let mut position = root.clone();
            position.make_move(&rated.next_move);
            self.build_subtree(position, rated, remaining)
        };
        let children = if depth > 2 && self.pool_size > 1 {
            let tasks: Vec<_> = ranked
                .into_iter()
                .map(|rated| move || expand_child(rated))
                .collect();
            pool::run_tasks(self.pool_size, tasks)
        } else {
            ranked.into_iter().map(expand_child).collect()
        };
        MoveTree {
            root: root.clone(),
            children,
        }
    }

    /// Rates every legal move of the position's side to move from their
    /// point of view and sorts descending.
    fn rank_moves(&self, position: &Position) -> Vec<RatedMove> {
        let mut rated: Vec<RatedMove> = position
            .generate_moves()
            .iter()
            .map(|next_move| rate_move(position, next_move, self.weights))
            .collect();
        rated.sort_by_key(|rated| std::cmp::Reverse(rated.score));
        rated
    }

    /// `position` is the state after playing `rated.next_move`; `depth` is
    /// the number of reply plies still to build below it.
    fn build_subtree(&self, position: Position, rated: RatedMove, depth: Depth) -> Node {
        let mut node = Node {
            rated,
            replies: Vec::new(),
        };
        if depth == 0 || node.rated.score.abs() > RESOLVED_SCORE {
            return node;
        }
        node.replies = self
            .rank_moves(&position)
            .into_iter()
            .map(|reply| {
                let mut next = position.clone();
                next.make_move(&reply.next_move);
                self.build_subtree(next, reply, depth - 1)
            })
            .collect();
        node
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::TreeBuilder;
    use crate::chess::position::Position;
    use crate::evaluation::Weights;

    fn setup(fen: &str) -> Position {
        Position::from_fen(fen).expect("parsing test position")
    }

    #[test]
    fn ranked_and_sorted_children() {
        let weights = Weights::default();
        let builder = TreeBuilder::new(&weights, 1);
        // White can capture an undefended pawn.
        let position = setup("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let tree = builder.build(&position, 1);
        let scores: Vec<i32> = tree.children().iter().map(|node| node.rated().score).collect();
        let mut sorted = scores.clone();
        sorted.sort_unstable_by_key(|score| std::cmp::Reverse(*score));
        assert_eq!(scores, sorted);
        // The capture rates best and depth 1 leaves no replies below it.
        assert_eq!(tree.best_move().unwrap().to_string(), "e4d5");
        assert!(tree.children()[0].replies().is_empty());
    }

    #[test]
    fn depth_two_sees_the_refutation() {
        let weights = Weights::default();
        let builder = TreeBuilder::new(&weights, 1);
        // The d5 pawn is defended: grabbing it with the rook loses rook for
        // pawn. Greedy depth 1 takes it anyway; depth 2 sees the recapture
        // and picks something else.
        let position = setup("7k/8/2p5/3p4/8/8/8/3R3K w - - 0 1");
        let greedy = builder.build(&position, 1);
        assert_eq!(greedy.best_move().unwrap().to_string(), "d1d5");
        let tree = builder.build(&position, 2);
        assert_ne!(tree.best_move().unwrap().to_string(), "d1d5");
    }

    #[test]
    fn mate_in_one_is_terminal() {
        let weights = Weights::default();
        let builder = TreeBuilder::new(&weights, 1);
        let position = setup("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let tree = builder.build(&position, 3);
        assert_eq!(tree.best_move().unwrap().to_string(), "a1a8");
        // The mating branch is resolved: no replies were expanded below it.
        let mate = tree
            .children()
            .iter()
            .find(|node| node.rated().next_move.to_string() == "a1a8")
            .unwrap();
        assert_eq!(mate.rated().score, 1_000_000);
        assert!(mate.replies().is_empty());
        assert_eq!(mate.backed_up_score(), 1_000_000);
    }

    #[test]
    fn empty_root_produces_no_moves() {
        let weights = Weights::default();
        let builder = TreeBuilder::new(&weights, 4);
        // Checkmated side has no tree to build.
        let position = setup("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        let tree = builder.build(&position, 5);
        assert!(tree.children().is_empty());
        assert_eq!(tree.best_move(), None);
        assert!(tree.principal_variation().is_empty());
    }

    #[test]
    fn parallel_and_serial_builds_agree() {
        let weights = Weights::default();
        let position = setup("7k/8/2p5/3p4/8/8/8/3R3K w - - 0 1");
        let serial = TreeBuilder::new(&weights, 1).build(&position, 3);
        let parallel = TreeBuilder::new(&weights, 4).build(&position, 3);
        assert_eq!(serial.best_move(), parallel.best_move());
        assert_eq!(serial.children().len(), parallel.children().len());
        assert_eq!(
            serial
                .principal_variation()
                .iter()
                .map(|rated| rated.next_move.to_string())
                .collect::<Vec<_>>(),
            parallel
                .principal_variation()
                .iter()
                .map(|rated| rated.next_move.to_string())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn backed_up_scores_negate_the_best_reply() {
        let weights = Weights::default();
        let builder = TreeBuilder::new(&weights, 1);
        let position = setup("7k/8/2p5/3p4/8/8/8/3R3K w - - 0 1");
        let tree = builder.build(&position, 2);
        for child in tree.children() {
            if let Some(best_reply) = child
                .replies()
                .iter()
                .map(super::Node::backed_up_score)
                .max()
            {
                assert_eq!(child.backed_up_score(), -best_reply);
            } else {
                assert_eq!(child.backed_up_score(), child.rated().score);
            }
        }
    }
}
