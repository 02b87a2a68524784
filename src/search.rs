//! Filterable, collapsible list of the orbit tree used to pick a focus body.

use crossterm::style::Color;

use crate::input::KEY_BACKSPACE;
use crate::keybind::{self, Keybinds};
use crate::orbit::{NodeId, OrbitTree};
use crate::surface::{Screen, Surface};
use crate::system::System;

#[derive(Clone, Debug)]
struct Row {
    node: NodeId,
    parent: Option<usize>,
    depth: usize,
    has_children: bool,
    collapsed: bool,
    hidden: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    Pending,
    Selected(NodeId),
    Cancelled,
}

/// Rows are kept in tree pre-order, so a row's index is its position in the
/// flattened list and every parent precedes its children.
#[derive(Debug)]
pub(crate) struct Search {
    rows: Vec<Row>,
    selection: usize,
    query: String,
    scroll: usize,
    dirty: bool,
}

impl Search {
    pub(crate) fn new(system: &System, focus: NodeId) -> Self {
        let mut s = Self {
            rows: Vec::new(),
            selection: 0,
            query: String::new(),
            scroll: 0,
            dirty: true,
        };
        s.rebuild(system, focus);
        s
    }

    fn rebuild(&mut self, system: &System, focus: NodeId) {
        self.rows.clear();
        self.push_subtree(system, OrbitTree::ROOT, None, 0);

        self.selection = self.rows.iter().position(|r| r.node == focus).unwrap_or(0);
        let mut up = self.rows[self.selection].parent;
        while let Some(i) = up {
            self.rows[i].collapsed = false;
            self.rows[i].hidden = false;
            up = self.rows[i].parent;
        }
        self.dirty = true;
    }

    fn push_subtree(&mut self, system: &System, node: NodeId, parent: Option<usize>, depth: usize) {
        let tree = &system.tree;
        let index = self.rows.len();
        let (collapsed, hidden) = match parent {
            None => (false, false),
            Some(_) => {
                let name = system.name(tree.entity(node));
                (
                    self.query.is_empty(),
                    !self.query.is_empty() && !name.contains(self.query.as_str()),
                )
            }
        };
        self.rows.push(Row {
            node,
            parent,
            depth,
            has_children: !tree.children(node).is_empty(),
            collapsed,
            hidden,
        });
        for &child in tree.children(node) {
            self.push_subtree(system, child, Some(index), depth + 1);
        }
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn selected(&self) -> NodeId {
        self.rows[self.selection].node
    }

    /// Hidden by an ancestor's collapse.
    fn folded(&self, i: usize) -> bool {
        let mut up = self.rows[i].parent;
        while let Some(p) = up {
            if self.rows[p].collapsed {
                return true;
            }
            up = self.rows[p].parent;
        }
        false
    }

    /// Rows that are drawn and can hold the cursor.
    pub(crate) fn is_selectable(&self, i: usize) -> bool {
        !self.rows[i].hidden && !self.folded(i)
    }

    fn visible(&self) -> Vec<usize> {
        (0..self.rows.len()).filter(|&i| self.is_selectable(i)).collect()
    }

    fn move_to(&mut self, target: Option<usize>) {
        if let Some(i) = target {
            self.selection = i;
            self.dirty = true;
        }
    }

    pub(crate) fn next(&mut self) {
        let t = (self.selection + 1..self.rows.len()).find(|&i| self.is_selectable(i));
        self.move_to(t);
    }

    pub(crate) fn prev(&mut self) {
        let t = (0..self.selection).rev().find(|&i| self.is_selectable(i));
        self.move_to(t);
    }

    pub(crate) fn top(&mut self) {
        let t = (0..self.rows.len()).find(|&i| self.is_selectable(i));
        self.move_to(t);
    }

    pub(crate) fn bottom(&mut self) {
        let t = (0..self.rows.len()).rev().find(|&i| self.is_selectable(i));
        self.move_to(t);
    }

    pub(crate) fn toggle_collapse(&mut self) {
        let row = &mut self.rows[self.selection];
        row.collapsed = !row.collapsed;
        self.dirty = true;
    }

    pub(crate) fn keypress(
        &mut self,
        key: i32,
        binds: &Keybinds,
        system: &System,
        focus: NodeId,
    ) -> SearchOutcome {
        if key < 0 {
            return SearchOutcome::Pending;
        }
        if binds.is(keybind::G_ESCAPE, key) {
            return SearchOutcome::Cancelled;
        }
        if binds.is(keybind::G_SELECT, key) {
            return SearchOutcome::Selected(self.selected());
        }
        if binds.is(keybind::SEARCH_NEXT, key) {
            self.next();
        } else if binds.is(keybind::SEARCH_PREV, key) {
            self.prev();
        } else if binds.is(keybind::SEARCH_TOP, key) {
            self.top();
        } else if binds.is(keybind::SEARCH_BOTTOM, key) {
            self.bottom();
        } else if binds.is(keybind::SEARCH_COLLAPSE, key) {
            self.toggle_collapse();
        } else if key == KEY_BACKSPACE || key == 8 {
            self.query.pop();
            self.rebuild(system, focus);
        } else if (32..=126).contains(&key) {
            self.query.push(key as u8 as char);
            self.rebuild(system, focus);
        }
        SearchOutcome::Pending
    }

    /// Redraws the list when something changed since the last draw.
    pub(crate) fn draw(&mut self, screen: &mut Screen, system: &System) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        screen.reset_pen();
        screen.buf.fill(Default::default());
        screen.print_line(0, &format!("Query: {}", self.query));

        let rows = self.visible();
        let height = (screen.buf.h as usize).saturating_sub(1);
        if height == 0 {
            return;
        }
        let cursor = rows.iter().position(|&i| i == self.selection);
        if let Some(c) = cursor {
            if c < self.scroll {
                self.scroll = c;
            } else if c >= self.scroll + height {
                self.scroll = c + 1 - height;
            }
        }
        self.scroll = self.scroll.min(rows.len().saturating_sub(height));

        for (line, &i) in rows.iter().skip(self.scroll).take(height).enumerate() {
            let row = &self.rows[i];
            let mut text = String::new();
            if self.query.is_empty() {
                text.push_str(&" ".repeat(row.depth * 4));
            }
            if row.has_children {
                text.push_str(if row.collapsed { "[+] " } else { "[-] " });
            }
            text.push_str(system.name(system.tree.entity(row.node)));

            if i == self.selection {
                screen.set_color(Color::Black, Color::White);
            } else {
                screen.set_color(Color::White, Color::Black);
            }
            screen.print_line(line as u16 + 1, &text);
        }
        screen.reset_pen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn setup() -> (System, Keybinds) {
        (System::new(&catalog::sol()).unwrap(), Keybinds::with_defaults())
    }

    fn node(system: &System, name: &str) -> NodeId {
        system.tree.find(&system.world, name).unwrap()
    }

    fn type_query(s: &mut Search, q: &str, k: &Keybinds, system: &System, focus: NodeId) {
        for ch in q.chars() {
            assert_eq!(s.keypress(ch as i32, k, system, focus), SearchOutcome::Pending);
        }
    }

    #[test]
    fn empty_query_shows_the_first_level() {
        let (system, _) = setup();
        let s = Search::new(&system, OrbitTree::ROOT);
        let names: Vec<_> = s
            .visible()
            .into_iter()
            .map(|i| system.name(system.tree.entity(s.rows[i].node)).to_string())
            .collect();
        assert_eq!(names.len(), 1 + 8 + 5);
        assert_eq!(names[0], "Sol");
        assert!(!names.iter().any(|n| n == "Luna"));
    }

    #[test]
    fn focus_inside_a_collapsed_branch_is_revealed() {
        let (system, _) = setup();
        let luna = node(&system, "Luna");
        let s = Search::new(&system, luna);
        assert_eq!(s.selected(), luna);
        assert!(s.is_selectable(s.selection));
    }

    #[test]
    fn absent_query_hides_everything_but_the_selection_path() {
        let (system, k) = setup();
        let luna = node(&system, "Luna");
        let mut s = Search::new(&system, luna);
        type_query(&mut s, "zzz", &k, &system, luna);
        assert_eq!(s.query(), "zzz");

        let earth = node(&system, "Earth");
        for (i, row) in s.rows.iter().enumerate() {
            let on_path = row.node == OrbitTree::ROOT || row.node == earth;
            assert_eq!(row.hidden, !on_path, "row {i}");
        }
        // The selection row itself stays hidden; only its ancestors are forced open.
        assert_eq!(s.selected(), luna);
        assert!(s.rows[s.selection].hidden);
    }

    #[test]
    fn filter_then_select() {
        let (system, k) = setup();
        let mut s = Search::new(&system, OrbitTree::ROOT);
        type_query(&mut s, "an", &k, &system, OrbitTree::ROOT);
        // the root stays listed; matches in tree order are Ganymede, Titan, Uranus
        s.top();
        assert_eq!(s.selected(), OrbitTree::ROOT);
        s.next();
        assert_eq!(s.selected(), node(&system, "Ganymede"));
        s.next();
        assert_eq!(s.selected(), node(&system, "Titan"));
        s.bottom();
        assert_eq!(s.selected(), node(&system, "Uranus"));
        s.next();
        assert_eq!(s.selected(), node(&system, "Uranus"), "no wrap past the end");
        assert_eq!(
            s.keypress(10, &k, &system, OrbitTree::ROOT),
            SearchOutcome::Selected(node(&system, "Uranus"))
        );
    }

    #[test]
    fn backspace_widens_the_filter() {
        let (system, k) = setup();
        let mut s = Search::new(&system, OrbitTree::ROOT);
        type_query(&mut s, "Mx", &k, &system, OrbitTree::ROOT);
        assert_eq!(s.visible().len(), 1);
        s.keypress(KEY_BACKSPACE, &k, &system, OrbitTree::ROOT);
        assert_eq!(s.query(), "M");
        // Mercury, Mars
        assert_eq!(s.visible().len(), 3);
    }

    #[test]
    fn collapse_toggles_children() {
        let (system, k) = setup();
        let mut s = Search::new(&system, OrbitTree::ROOT);
        let earth = node(&system, "Earth");
        let before = s.visible().len();
        while s.selected() != earth {
            s.next();
        }
        s.keypress(crate::input::KEY_RIGHT, &k, &system, OrbitTree::ROOT);
        assert_eq!(s.visible().len(), before + 1);
        s.next();
        assert_eq!(s.selected(), node(&system, "Luna"));
        assert_eq!(s.keypress(27, &k, &system, OrbitTree::ROOT), SearchOutcome::Cancelled);
    }

    #[test]
    fn draw_marks_collapsible_rows_and_the_cursor() {
        let (system, _) = setup();
        let mut s = Search::new(&system, OrbitTree::ROOT);
        let mut screen = Screen::new(30, 8);
        s.draw(&mut screen, &system);
        assert_eq!(screen.row_text(0).trim_end(), "Query:");
        assert_eq!(screen.row_text(1).trim_end(), "[-] Sol");
        assert_eq!(screen.row_text(2).trim_end(), "    Mercury");
        assert_eq!(screen.row_text(4).trim_end(), "    [+] Earth");
        assert_eq!(screen.get(0, 1).map(|c| c.bg), Some(Color::White));

        s.bottom();
        s.draw(&mut screen, &system);
        assert_eq!(screen.row_text(7).trim_end(), "    2010 TK7");
    }
}
