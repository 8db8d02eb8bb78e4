#[derive(Debug, Default)]
pub(super) struct Input {
    pub(super) buf: String,
    pub(super) cursor: usize,
}

impl Input {
    pub(super) fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
    }

    pub(super) fn insert_char(&mut self, c: char) {
        self.buf.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub(super) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_boundary(&self.buf, self.cursor);
        self.buf.remove(prev);
        self.cursor = prev;
    }

    pub(super) fn delete(&mut self) {
        if self.cursor >= self.buf.len() {
            return;
        }
        self.buf.remove(self.cursor);
    }

    pub(super) fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = prev_boundary(&self.buf, self.cursor);
        }
    }

    pub(super) fn move_right(&mut self) {
        if self.cursor < self.buf.len() {
            self.cursor = next_boundary(&self.buf, self.cursor);
        }
    }
}

fn prev_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx - 1;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_respects_multibyte_boundaries() {
        let mut input = Input::default();
        for c in "eletrônicos".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.buf, "eletrônicos");

        input.backspace();
        input.backspace();
        input.backspace();
        assert_eq!(input.buf, "eletrôni");

        input.move_left();
        input.move_left();
        input.move_left();
        input.delete();
        assert_eq!(input.buf, "eletrni");
    }
}
