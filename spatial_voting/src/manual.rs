/*!

This is the long-form manual for `spatial_voting` and `simvote`.

## Profiles

Voters and candidates are positions on the [-1, 1] x [-1, 1] plane. The
affinity of a voter for a candidate is

```text
affinity = (max_distance - distance) / max_distance
```

where `distance` is the euclidean distance between them and `max_distance`
is the diagonal of the plane (`2 * sqrt(2)`). A profile lists all the
candidates by decreasing affinity: closest first. When two candidates are at
the same distance, the one declared first comes first.

Profiles can be built from positions with [crate::builder::Builder], or
directly from affinities with [crate::Profile::new].

## Voting methods

### `plurality`

Each voter gives one point to their first choice.

### `veto`

Each voter gives one point to every candidate except their last choice. With a
single candidate, that candidate is elected directly.

### `borda`

The candidate at rank `i` (0 for the first choice) receives
`bordaMaximum - i * bordaStep` points from each voter. Contributions stop at 0,
they are never negative. By default, `bordaMaximum` is the number of candidates
and `bordaStep` is 1.

### `approval`

A voter approves of every candidate whose affinity, as a percentage, is at least
`100 - approvalRadius`. The boundary is included: with a radius of 25, a
candidate with an affinity of exactly 0.75 is approved. Each approval is one
point. If nobody approves of anybody, there is no winner. The default radius
is 25.

### `instantRunoff`

Each round, the first choices of the voters are counted. A candidate with
strictly more than half of the voters is elected. Otherwise, the candidate with
the fewest first choices is eliminated and the next round starts. Among several
candidates with the fewest first choices, the last one in alphabetical order
is eliminated.

### `condorcet`

All the pairs of candidates are compared: for each pair, the candidate ranked
higher by more voters wins the duel. Equal counts are a draw. A candidate who
wins all their duels is elected.

Otherwise, `condorcetMethod` decides:

- `copeland` (default): one point per duel won, half a point per draw. The
  highest score wins.
- `simpson`: the score of a candidate is the largest margin by which they lost
  a duel. The lowest score wins.

If several candidates are still tied, `tiebreakMode` picks the winner:

- `lexicographic` (default): the first in alphabetical order.
- `random`: a choice derived from a SHA-256 hash of the labels and the number
  of wins, losses and draws of the tied candidates. It looks random but always
  gives the same answer for the same election.

## Ties

For all the methods except the Condorcet fallback, a tie between candidates
with the same best score goes to the first one in alphabetical order, ignoring
case. The tied candidates are reported in the order in which they first
received points.

## `simvote` configuration

`simvote` reads an election description in JSON:

```text
{
  "outputSettings": { "contestName": "Example" },
  "candidates": [ { "name": "A", "x": -0.5, "y": 0.2 }, ... ],
  "voters": [ { "name": "1", "x": 0.1, "y": 0.0 }, ... ],
  "rules": {
    "methods": ["plurality", "borda", "condorcet"],
    "bordaStep": 1,
    "condorcetMethod": "simpson",
    "tiebreakMode": "random"
  }
}
```

Instead of `candidates` and `voters`, the profiles can be given directly:

```text
"profiles": [
  { "voter": "1", "preferences": [ { "candidate": "A", "affinity": 0.7 }, ... ] },
  ...
]
```

The summary lists, for each method, the winner, whether a tie had to be
broken, and the details of the count.

*/
